//! Confirming a selection session.
//!
//! Confirm renders a thumbnail for every region. A region whose thumbnail
//! cannot be produced is dropped and logged; confirmation proceeds with the
//! rest. Only when nothing survives is the whole confirm refused.

use thiserror::Error;

use super::{thumbnail_data_url, ThumbnailError};
use crate::config::SelectorConfig;
use crate::decode::SourceImage;
use crate::region::Region;

/// Errors that block a confirm.
#[derive(Debug, Error)]
pub enum ConfirmError {
    /// Nothing was selected.
    #[error("No regions selected")]
    NoRegions,

    /// Every region failed to render; the source image is most likely bad.
    #[error("Could not generate thumbnails for any of the {count} regions. Please retry loading the image.")]
    AllThumbnailsFailed {
        count: usize,
        #[source]
        last: ThumbnailError,
    },
}

/// Result of a successful confirm.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmOutcome {
    /// Regions with `thumbnail_url` populated, in their original order.
    pub regions: Vec<Region>,
    /// Ids of regions that were dropped because their thumbnail failed.
    pub dropped: Vec<String>,
}

impl ConfirmOutcome {
    /// Whether some regions were dropped.
    pub fn is_partial(&self) -> bool {
        !self.dropped.is_empty()
    }
}

/// Render thumbnails for all `regions` on `image`.
pub fn confirm_regions(
    image: &SourceImage,
    regions: &[Region],
    config: &SelectorConfig,
) -> Result<ConfirmOutcome, ConfirmError> {
    if regions.is_empty() {
        return Err(ConfirmError::NoRegions);
    }

    let mut confirmed = Vec::with_capacity(regions.len());
    let mut dropped = Vec::new();
    let mut last_error = None;

    for region in regions {
        match thumbnail_data_url(image, region, config) {
            Ok(url) => {
                let mut region = region.clone();
                region.thumbnail_url = Some(url);
                confirmed.push(region);
            }
            Err(e) => {
                log::warn!("dropping region {}: thumbnail failed: {}", region.id, e);
                dropped.push(region.id.clone());
                last_error = Some(e);
            }
        }
    }

    if confirmed.is_empty() {
        // Every region failed, so `last_error` is set
        let last = last_error.unwrap_or(ThumbnailError::EmptyImage);
        return Err(ConfirmError::AllThumbnailsFailed {
            count: regions.len(),
            last,
        });
    }

    if !dropped.is_empty() {
        log::warn!(
            "confirmed {} of {} regions; {} failed",
            confirmed.len(),
            regions.len(),
            dropped.len()
        );
    } else {
        log::debug!("confirmed {} regions", confirmed.len());
    }

    Ok(ConfirmOutcome {
        regions: confirmed,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{NormPoint, NormRect};
    use crate::region::{Color, Stroke};

    fn image() -> SourceImage {
        SourceImage::from_rgba_image(image::RgbaImage::from_pixel(
            50,
            40,
            image::Rgba([200, 100, 50, 255]),
        ))
    }

    fn good_rect(id: &str) -> Region {
        Region::rect(id, NormRect::new(0.1, 0.1, 0.5, 0.5))
    }

    fn bad_brush(id: &str) -> Region {
        Region::brush(id, vec![Stroke::new(0.05, Color::default())])
    }

    #[test]
    fn test_all_regions_confirmed() {
        let mut stroke = Stroke::new(0.05, Color::default());
        stroke.points = vec![NormPoint::new(0.2, 0.2), NormPoint::new(0.3, 0.4)];
        let regions = vec![good_rect("a"), Region::brush("b", vec![stroke])];

        let outcome = confirm_regions(&image(), &regions, &SelectorConfig::default()).unwrap();
        assert_eq!(outcome.regions.len(), 2);
        assert!(!outcome.is_partial());
        for r in &outcome.regions {
            assert!(r.thumbnail_url.as_deref().unwrap().starts_with("data:image/png;base64,"));
        }
    }

    #[test]
    fn test_failed_region_dropped() {
        let regions = vec![good_rect("a"), bad_brush("b"), good_rect("c")];

        let outcome = confirm_regions(&image(), &regions, &SelectorConfig::default()).unwrap();
        let ids: Vec<_> = outcome.regions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(outcome.dropped, ["b"]);
        assert!(outcome.is_partial());
    }

    #[test]
    fn test_all_failed_blocks_confirm() {
        let regions = vec![bad_brush("a"), bad_brush("b")];

        let err = confirm_regions(&image(), &regions, &SelectorConfig::default()).unwrap_err();
        assert!(matches!(err, ConfirmError::AllThumbnailsFailed { count: 2, .. }));
        assert!(err.to_string().contains("retry loading the image"));
    }

    #[test]
    fn test_unloaded_image_fails_every_region() {
        let empty = SourceImage {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        };
        let err = confirm_regions(&empty, &[good_rect("a")], &SelectorConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfirmError::AllThumbnailsFailed {
                last: ThumbnailError::EmptyImage,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_selection() {
        let err = confirm_regions(&image(), &[], &SelectorConfig::default()).unwrap_err();
        assert!(matches!(err, ConfirmError::NoRegions));
    }
}
