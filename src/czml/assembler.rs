use std::num::NonZeroU32;

use crate::config::{ConfigError, SceneConfig};
use crate::czml::colors::{ColorCursor, Palette, Rgba};
use crate::czml::document::{
    Billboard, Clock, ClockRange, ClockStep, ColorValue, Document, HorizontalOrigin,
    InterpolationAlgorithm, IntervalBoolean, IntervalNumber, Label, LabelStyle, Material, Packet,
    Path, PixelOffset, Position, ReferenceFrame, SolidColor, VerticalOrigin,
};
use crate::error::Error;
use crate::path::{segment, PathSegment};
use crate::propagation::{
    sample_count, PositionSample, PositionSampler, Propagator, SampleFailure, Sgp4Propagator,
};
use crate::tle::TleRecord;
use crate::window::{iso8601, TimeWindow};

/// A satellite left out of the document.
#[derive(Debug)]
pub struct SatelliteFailure {
    pub satellite: String,
    pub error: Error,
}

/// A sample dropped from a satellite that was still rendered.
#[derive(Debug)]
pub struct SampleGap {
    pub satellite: String,
    pub failure: SampleFailure,
}

#[derive(Debug)]
pub struct Assembly {
    pub document: Document,
    pub failures: Vec<SatelliteFailure>,
    pub gaps: Vec<SampleGap>,
}

impl Assembly {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.gaps.is_empty()
    }

    /// The document, or the first skipped satellite or dropped sample as an
    /// error naming its satellite.
    pub fn into_strict(self) -> Result<Document, Error> {
        if let Some(failure) = self.failures.into_iter().next() {
            return Err(Error::Satellite {
                satellite: failure.satellite,
                source: Box::new(failure.error),
            });
        }
        if let Some(gap) = self.gaps.into_iter().next() {
            return Err(Error::Satellite {
                satellite: gap.satellite,
                source: Box::new(gap.failure.into()),
            });
        }
        Ok(self.document)
    }
}

/// Builds CZML scenes from element sets.
///
/// Styling comes from a [`SceneConfig`] resolved once at construction; each
/// [`assemble`](Self::assemble) call starts its own colour cycle.
pub struct SceneAssembler {
    config: SceneConfig,
    palette: Palette,
    step: NonZeroU32,
    parallel: bool,
}

impl SceneAssembler {
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        let palette = config.resolve_palette()?;
        let step = config.step_seconds()?;
        Ok(Self {
            config,
            palette,
            step,
            parallel: false,
        })
    }

    /// Sample positions across the rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn assemble(&self, records: &[TleRecord], window: &TimeWindow) -> Assembly {
        let mut document = Document::new(self.document_packet(window));
        let mut failures = Vec::new();
        let mut gaps = Vec::new();
        let mut cursor = ColorCursor::default();

        for record in records {
            // Colours follow file order, failed satellites included.
            let color = cursor.advance(&self.palette);
            log::info!(
                "{}: period {:.2} min",
                record.name(),
                record.orbital_period_minutes()
            );

            match self.satellite_packet(record, color, window) {
                Ok((packet, dropped)) => {
                    for failure in dropped {
                        log::warn!("{}: dropped {}", record.name(), failure);
                        gaps.push(SampleGap {
                            satellite: record.name().to_string(),
                            failure,
                        });
                    }
                    document.push(packet);
                }
                Err(error) => {
                    log::warn!("Skipping {}: {}", record.name(), error);
                    failures.push(SatelliteFailure {
                        satellite: record.name().to_string(),
                        error,
                    });
                }
            }
        }

        Assembly {
            document,
            failures,
            gaps,
        }
    }

    pub fn document_packet(&self, window: &TimeWindow) -> Packet {
        Packet {
            id: "document".into(),
            version: Some("1.0".into()),
            clock: Some(Clock {
                interval: window.to_interval_string(),
                current_time: iso8601(window.start()),
                multiplier: self.config.multiplier,
                range: ClockRange::LoopStop,
                step: ClockStep::SystemClockMultiplier,
            }),
            ..Default::default()
        }
    }

    /// Packet for one satellite plus the samples that could not be computed.
    pub fn satellite_packet(
        &self,
        record: &TleRecord,
        color: Rgba,
        window: &TimeWindow,
    ) -> Result<(Packet, Vec<SampleFailure>), Error> {
        let propagator = Sgp4Propagator::from_record(record)?;
        log::debug!("{}: element epoch {}", record.name(), propagator.epoch());
        let (position, dropped) = self.position(propagator, window)?;
        let segments = segment(window, record.orbital_period());

        let packet = Packet {
            id: format!("Satellite/{}", record.name()),
            availability: Some(window.to_interval_string()),
            description: Some(format!(
                "{} {}",
                self.config.description_template,
                record.name()
            )),
            billboard: Some(self.billboard()),
            label: Some(self.label(record.name(), color)),
            path: Some(self.path(&segments, color, window)),
            position: Some(position),
            ..Default::default()
        };
        Ok((packet, dropped))
    }

    fn billboard(&self) -> Billboard {
        Billboard {
            image: self.config.satellite_image_uri.clone(),
            scale: self.config.billboard_scale,
            show: true,
        }
    }

    fn label(&self, text: &str, color: Rgba) -> Label {
        Label {
            fill_color: ColorValue { rgba: color },
            font: self.config.label_font.clone(),
            horizontal_origin: HorizontalOrigin::Left,
            outline_color: ColorValue { rgba: Rgba::BLACK },
            outline_width: 2.0,
            pixel_offset: PixelOffset {
                cartesian2: [12.0, 0.0],
            },
            style: LabelStyle::FillAndOutline,
            text: text.to_string(),
            show: true,
            vertical_origin: VerticalOrigin::Center,
        }
    }

    pub fn path(&self, segments: &[PathSegment], color: Rgba, window: &TimeWindow) -> Path {
        Path {
            show: vec![IntervalBoolean {
                interval: window.to_interval_string(),
                boolean: true,
            }],
            width: self.config.path_width,
            material: Material {
                solid_color: SolidColor {
                    color: ColorValue { rgba: color },
                },
            },
            resolution: self.config.path_resolution,
            lead_time: segments.iter().map(IntervalNumber::lead).collect(),
            trail_time: segments.iter().map(IntervalNumber::trail).collect(),
        }
    }

    /// Samples `propagator` over the window plus the configured margin.
    ///
    /// Failed offsets are left out of the cartesian list and returned; the
    /// call only fails when no sample succeeds.
    pub fn position<P: Propagator + Sync>(
        &self,
        propagator: P,
        window: &TimeWindow,
    ) -> Result<(Position, Vec<SampleFailure>), Error> {
        let count = sample_count(window, self.step, self.config.sample_margin);
        let sampler = PositionSampler::new(propagator, window.start(), self.step);
        let results = if self.parallel {
            sampler.sample_parallel(count)
        } else {
            sampler.sample_each(count)
        };

        let mut samples: Vec<PositionSample> = Vec::with_capacity(count);
        let mut dropped = Vec::new();
        for result in results {
            match result {
                Ok(sample) => samples.push(sample),
                Err(failure) => dropped.push(failure),
            }
        }

        if samples.is_empty() {
            if let Some(first) = dropped.first() {
                return Err(first.clone().into());
            }
        }

        let cartesian = samples
            .iter()
            .flat_map(|s| [s.offset_seconds as f64, s.x, s.y, s.z])
            .collect();

        let position = Position {
            interpolation_algorithm: InterpolationAlgorithm::Lagrange,
            interpolation_degree: self.config.interpolation_degree,
            reference_frame: ReferenceFrame::Inertial,
            epoch: iso8601(window.start()),
            cartesian,
        };
        Ok((position, dropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::Vector3;
    use crate::propagation::PropagationError;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    const ISS_LINE1: &str =
        "1 25544U 98067A   25278.49802050  .00011384  00000+0  20935-3 0  9990";
    const ISS_LINE2: &str =
        "2 25544  51.6327 120.3420 0000884 206.2421 153.8523 15.49697304532279";

    fn iss(name: &str) -> TleRecord {
        TleRecord::new(name, ISS_LINE1, ISS_LINE2).unwrap()
    }

    fn window(hours: i64) -> TimeWindow {
        let start = Utc.with_ymd_and_hms(2025, 10, 6, 0, 0, 0).unwrap();
        TimeWindow::starting_at(start, Duration::hours(hours)).unwrap()
    }

    fn assembler() -> SceneAssembler {
        SceneAssembler::new(SceneConfig::default()).unwrap()
    }

    /// Fails at every offset past `good_until` seconds.
    struct Flaky {
        start: DateTime<Utc>,
        good_until: i64,
    }

    impl Propagator for Flaky {
        fn position_km(&self, at: DateTime<Utc>) -> Result<Vector3, PropagationError> {
            if (at - self.start).num_seconds() > self.good_until {
                return Err(PropagationError::NonFinite { at });
            }
            Ok([7000.0, 0.0, 0.0])
        }
    }

    #[test]
    fn document_packet_carries_clock() {
        let w = window(24);
        let value = serde_json::to_value(assembler().document_packet(&w)).unwrap();
        assert_eq!(value["id"], "document");
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["clock"]["interval"], w.to_interval_string());
        assert_eq!(value["clock"]["multiplier"], 60);
        assert_eq!(value["clock"]["range"], "LOOP_STOP");
    }

    #[test]
    fn satellite_packet_shape() {
        let w = window(6);
        let (packet, dropped) = assembler()
            .satellite_packet(&iss("ISS (ZARYA)"), Rgba::opaque(1, 2, 3), &w)
            .unwrap();
        assert!(dropped.is_empty());
        assert_eq!(packet.id, "Satellite/ISS (ZARYA)");
        assert_eq!(
            packet.description.as_deref(),
            Some("Orbit of Satellite:  ISS (ZARYA)")
        );

        let segments = segment(&w, iss("x").orbital_period());
        let path = packet.path.unwrap();
        assert_eq!(path.lead_time.len(), segments.len());
        assert_eq!(path.trail_time.len(), segments.len());
        assert_eq!(path.resolution, 120);

        // 6h at 300s: 72 samples plus the margin of 5.
        let position = packet.position.unwrap();
        assert_eq!(position.cartesian.len(), 4 * 77);
        assert_eq!(position.cartesian[4], 300.0);
        assert_eq!(position.epoch, iso8601(w.start()));
    }

    #[test]
    fn colors_cycle_in_file_order() {
        let config = SceneConfig {
            palette: Some(vec![[255, 0, 0], [0, 0, 255]]),
            ..SceneConfig::default()
        };
        let records = [iss("A"), iss("B"), iss("C")];
        let assembly = SceneAssembler::new(config).unwrap().assemble(&records, &window(2));
        assert!(assembly.is_complete());

        let colors: Vec<Rgba> = assembly.document.packets()[1..]
            .iter()
            .map(|p| p.label.as_ref().unwrap().fill_color.rgba)
            .collect();
        assert_eq!(
            colors,
            vec![Rgba::opaque(255, 0, 0), Rgba::opaque(0, 0, 255), Rgba::opaque(255, 0, 0)]
        );
    }

    #[test]
    fn parallel_matches_sequential() {
        let w = window(3);
        let record = iss("ISS");
        let a = assembler().satellite_packet(&record, Rgba::BLACK, &w).unwrap().0;
        let b = assembler()
            .parallel(true)
            .satellite_packet(&record, Rgba::BLACK, &w)
            .unwrap()
            .0;
        assert_eq!(a.position.unwrap().cartesian, b.position.unwrap().cartesian);
    }

    #[test]
    fn failed_samples_are_dropped_and_reported() {
        let w = window(1);
        let flaky = Flaky {
            start: w.start(),
            good_until: 600,
        };
        let (position, dropped) = assembler().position(flaky, &w).unwrap();
        // 12 + 5 samples, offsets 0..=600 survive.
        assert_eq!(position.cartesian.len(), 4 * 3);
        assert_eq!(dropped.len(), 14);
        assert_eq!(dropped[0].offset_seconds, 900);
        assert_eq!(position.cartesian[1], 7_000_000.0);
    }

    #[test]
    fn strict_assembly_reports_first_problem_once() {
        let w = window(1);
        let failure = SampleFailure {
            offset_seconds: 900,
            source: PropagationError::NonFinite { at: w.start() },
        };
        let assembly = Assembly {
            document: Document::new(assembler().document_packet(&w)),
            failures: Vec::new(),
            gaps: vec![SampleGap {
                satellite: "ISS".into(),
                failure,
            }],
        };
        assert!(!assembly.is_complete());

        let message = assembly.into_strict().unwrap_err().to_string();
        assert!(message.starts_with("ISS: sample at +900s"), "{message}");
        assert_eq!(message.matches("ISS").count(), 1);

        let complete = assembler().assemble(&[iss("ISS")], &w);
        assert_eq!(complete.into_strict().unwrap().packets().len(), 2);
    }

    #[test]
    fn all_samples_failing_is_an_error() {
        let w = window(1);
        let flaky = Flaky {
            start: w.start(),
            good_until: -1,
        };
        let err = assembler().position(flaky, &w).unwrap_err();
        assert!(matches!(err, Error::Sample(ref f) if f.offset_seconds == 0));
    }
}
