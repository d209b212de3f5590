//! Curve probing: nearest point for a slider value, optimum point per channel.
//!
//! All functions here are pure: they read a slice of samples and return a
//! borrowed sample (or an error). Nothing is cached between calls, so the
//! front-ends can simply re-probe on every slider change.
//!
//! Tie-break policy for both queries: the first matching sample in input order
//! wins. Input order is *not* assumed to be spend-sorted.

use std::cmp::Ordering;

use crate::domain::CurvePoint;
use crate::error::ProbeError;

/// Samples belonging to `channel`, in input order.
fn channel_samples<'a, 'c>(samples: &'a [CurvePoint], channel: &'c str) -> impl Iterator<Item = &'a CurvePoint> {
    samples.iter().filter(move |p| p.channel == channel)
}

fn empty_channel(channel: &str) -> ProbeError {
    ProbeError::EmptyChannel {
        channel: channel.to_string(),
    }
}

/// Find the sample of `channel` whose spend is closest to `target`.
///
/// Equidistant candidates resolve to the one appearing earliest in `samples`.
///
/// # Errors
/// `ProbeError::EmptyChannel` when no sample belongs to `channel`.
pub fn nearest_point<'a>(samples: &'a [CurvePoint], channel: &str, target: f64) -> Result<&'a CurvePoint, ProbeError> {
    let mut best: Option<(&CurvePoint, f64)> = None;
    for p in channel_samples(samples, channel) {
        let dist = (p.spend - target).abs();
        match best {
            Some((_, best_dist)) if dist.total_cmp(&best_dist) != Ordering::Less => {}
            _ => best = Some((p, dist)),
        }
    }
    best.map(|(p, _)| p).ok_or_else(|| empty_channel(channel))
}

/// Find the sample of `channel` with the maximum response.
///
/// Several samples may share the maximum; the first in input order is returned.
///
/// # Errors
/// `ProbeError::EmptyChannel` when no sample belongs to `channel`.
pub fn optimum_point<'a>(samples: &'a [CurvePoint], channel: &str) -> Result<&'a CurvePoint, ProbeError> {
    let mut best: Option<&CurvePoint> = None;
    for p in channel_samples(samples, channel) {
        match best {
            Some(b) if p.response.total_cmp(&b.response) != Ordering::Greater => {}
            _ => best = Some(p),
        }
    }
    best.ok_or_else(|| empty_channel(channel))
}

/// Distinct channels in first-seen order.
pub fn channels(samples: &[CurvePoint]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for p in samples {
        if !out.iter().any(|c| c == &p.channel) {
            out.push(p.channel.clone());
        }
    }
    out
}

/// The optimum point of every channel, in first-seen channel order.
pub fn optimum_points(samples: &[CurvePoint]) -> Vec<&CurvePoint> {
    channels(samples)
        .iter()
        .filter_map(|c| optimum_point(samples, c).ok())
        .collect()
}

/// A channel's samples sorted by spend ascending, for drawing the curve as a line.
///
/// The sort is stable, so duplicate spends keep their input order.
pub fn channel_curve<'a>(samples: &'a [CurvePoint], channel: &str) -> Vec<&'a CurvePoint> {
    let mut out: Vec<&CurvePoint> = channel_samples(samples, channel).collect();
    out.sort_by(|a, b| a.spend.total_cmp(&b.spend));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn facebook() -> Vec<CurvePoint> {
        vec![
            CurvePoint::new("facebook", 0.0, 0.0),
            CurvePoint::new("facebook", 1000.0, 5.0),
            CurvePoint::new("facebook", 2000.0, 3.0),
        ]
    }

    #[test]
    fn optimum_and_nearest_on_facebook_curve() {
        let samples = facebook();
        let opt = optimum_point(&samples, "facebook").unwrap();
        assert_eq!(opt, &CurvePoint::new("facebook", 1000.0, 5.0));

        let near = nearest_point(&samples, "facebook", 1100.0).unwrap();
        assert_eq!(near, &CurvePoint::new("facebook", 1000.0, 5.0));
    }

    #[test]
    fn unknown_channel_is_an_error() {
        let samples = facebook();
        let err = nearest_point(&samples, "tiktok", 500.0).unwrap_err();
        assert_eq!(
            err,
            ProbeError::EmptyChannel {
                channel: "tiktok".to_string()
            }
        );
        assert!(optimum_point(&samples, "tiktok").is_err());
        assert!(optimum_point(&[], "facebook").is_err());
    }

    #[test]
    fn equidistant_candidates_prefer_input_order() {
        let samples = vec![CurvePoint::new("x", 100.0, 1.0), CurvePoint::new("x", 300.0, 2.0)];
        assert_eq!(nearest_point(&samples, "x", 200.0).unwrap().spend, 100.0);

        // Not spend-sorted: the earlier row still wins, even though its spend is higher.
        let reversed = vec![CurvePoint::new("x", 300.0, 2.0), CurvePoint::new("x", 100.0, 1.0)];
        assert_eq!(nearest_point(&reversed, "x", 200.0).unwrap().spend, 300.0);
    }

    #[test]
    fn tied_maximum_returns_first() {
        let samples = vec![
            CurvePoint::new("g", 0.0, 1.0),
            CurvePoint::new("g", 500.0, 4.0),
            CurvePoint::new("g", 900.0, 4.0),
        ];
        assert_eq!(optimum_point(&samples, "g").unwrap().spend, 500.0);
    }

    #[test]
    fn single_sample_always_matches() {
        let samples = vec![CurvePoint::new("solo", 42.0, 0.3)];
        for target in [0.0, 42.0, 10_000.0] {
            assert_eq!(nearest_point(&samples, "solo", target).unwrap().spend, 42.0);
        }
    }

    #[test]
    fn other_channels_are_ignored() {
        let mut samples = facebook();
        samples.insert(0, CurvePoint::new("tiktok", 1100.0, 99.0));
        let near = nearest_point(&samples, "facebook", 1100.0).unwrap();
        assert_eq!(near.channel, "facebook");
        assert_eq!(optimum_point(&samples, "facebook").unwrap().response, 5.0);
    }

    #[test]
    fn channels_keep_first_seen_order() {
        let samples = vec![
            CurvePoint::new("tiktok", 0.0, 0.0),
            CurvePoint::new("facebook", 0.0, 0.0),
            CurvePoint::new("tiktok", 1.0, 0.0),
            CurvePoint::new("google_ads", 0.0, 0.0),
        ];
        assert_eq!(channels(&samples), vec!["tiktok", "facebook", "google_ads"]);
        assert_eq!(optimum_points(&samples).len(), 3);
    }

    #[test]
    fn channel_curve_sorts_by_spend() {
        let samples = vec![
            CurvePoint::new("a", 300.0, 0.0),
            CurvePoint::new("b", 100.0, 0.0),
            CurvePoint::new("a", 100.0, 0.0),
        ];
        let curve: Vec<f64> = channel_curve(&samples, "a").iter().map(|p| p.spend).collect();
        assert_eq!(curve, vec![100.0, 300.0]);
    }

    fn arb_samples() -> impl Strategy<Value = Vec<CurvePoint>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["facebook", "google_ads", "tiktok"]),
                0u32..10_000,
                -5.0f64..5.0,
            ),
            1..60,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(c, s, r)| CurvePoint::new(c, s as f64, r))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn nearest_belongs_to_channel_and_is_minimal(samples in arb_samples(), target in 0.0f64..12_000.0) {
            let channel = samples[0].channel.clone();
            let near = nearest_point(&samples, &channel, target).unwrap();
            prop_assert_eq!(&near.channel, &channel);
            let dist = (near.spend - target).abs();
            for p in samples.iter().filter(|p| p.channel == channel) {
                prop_assert!(dist <= (p.spend - target).abs());
            }
            // First minimal sample in input order.
            let first = samples
                .iter()
                .find(|p| p.channel == channel && (p.spend - target).abs() == dist)
                .unwrap();
            prop_assert!(std::ptr::eq(near, first));
        }

        #[test]
        fn exact_spend_has_distance_zero(samples in arb_samples(), idx in any::<prop::sample::Index>()) {
            let pick = &samples[idx.index(samples.len())];
            let near = nearest_point(&samples, &pick.channel, pick.spend).unwrap();
            prop_assert_eq!(near.spend, pick.spend);
        }

        #[test]
        fn optimum_dominates_channel(samples in arb_samples()) {
            for channel in channels(&samples) {
                let opt = optimum_point(&samples, &channel).unwrap();
                for p in samples.iter().filter(|p| p.channel == channel) {
                    prop_assert!(opt.response >= p.response);
                }
            }
        }

        #[test]
        fn probes_are_repeatable(samples in arb_samples(), target in 0.0f64..12_000.0) {
            let channel = samples[0].channel.clone();
            prop_assert!(std::ptr::eq(
                nearest_point(&samples, &channel, target).unwrap(),
                nearest_point(&samples, &channel, target).unwrap()
            ));
            prop_assert!(std::ptr::eq(
                optimum_point(&samples, &channel).unwrap(),
                optimum_point(&samples, &channel).unwrap()
            ));
        }
    }
}
