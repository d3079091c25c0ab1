use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{map_avatar, AvatarCrop, AvatarLayout};

/// A character's avatar crops, keyed by style id.
///
/// Stored as a JSON object on the character record. Legacy crops are
/// converted while loading, so everything read back out is canonical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarProfile {
    crops: BTreeMap<String, AvatarCrop>,
}

impl AvatarProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn crop_for(&self, style_id: &str) -> Option<&AvatarCrop> {
        self.crops.get(style_id)
    }

    /// Layout for a style; styles without a crop use the cover fallback.
    pub fn layout_for(&self, style_id: &str) -> AvatarLayout {
        map_avatar(self.crop_for(style_id))
    }

    pub fn set_crop(&mut self, style_id: impl Into<String>, crop: AvatarCrop) {
        self.crops.insert(style_id.into(), crop);
    }

    pub fn remove_crop(&mut self, style_id: &str) -> Option<AvatarCrop> {
        self.crops.remove(style_id)
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}
