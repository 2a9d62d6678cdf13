// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
//! View state for haptic patterns and audio uploads.
//!
//! Haptic analysis is a pure function of the pattern text and is memoized on that text, so
//! re-rendering an unchanged document is free. Audio uploads are decoded once each and
//! replace whatever the previous upload produced.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::audio::{
    process_upload, validate_upload, AudioAnalysis, AudioDecoder, AudioSample, AudioSummary,
    DEFAULT_MAX_POINTS,
};
use crate::export::{audio_csv, haptic_csv, AUDIO_CSV_FILENAME};
use crate::pattern::extract::MIN_VISUAL_DURATION;
use crate::pattern::{
    extract_pattern, EventDurationDefaults, PatternDocument, DEFAULT_PATTERN,
};
use crate::sampler::{
    build_event_streams, build_samples, EventStreams, SampledPoint, DEFAULT_SAMPLE_COUNT,
};
use crate::summary::{summarize, Summary};
use crate::util::waveform_csv_filename;

/// Parameters of a haptic analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    pub sample_count: usize,
    pub event_durations: EventDurationDefaults,
    pub min_visual_duration: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            sample_count: DEFAULT_SAMPLE_COUNT,
            event_durations: EventDurationDefaults::default(),
            min_visual_duration: MIN_VISUAL_DURATION,
        }
    }
}

/// Everything derived from one version of the pattern text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HapticAnalysis {
    /// Intensity and sharpness curves sampled over the curve duration. Empty when the pattern
    /// has no items.
    pub curves: Vec<SampledPoint>,
    /// Summary of `curves`.
    pub summary: Option<Summary>,
    /// Per event type streams over the overall duration.
    pub events: EventStreams,
    /// The overall timeline length.
    pub duration: f64,
    /// Set when the text could not be parsed. All other fields are empty then.
    pub error: Option<String>,
}

/// Analyzes pattern text. Parse failures produce an empty analysis carrying the message.
pub fn analyze_text(text: &str, options: &AnalysisOptions) -> HapticAnalysis {
    match PatternDocument::parse(text) {
        Ok(document) => analyze(&document, options),
        Err(e) => {
            error!(err = %e, "Unable to parse pattern");
            HapticAnalysis {
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    }
}

/// Analyzes a parsed document.
pub fn analyze(document: &PatternDocument, options: &AnalysisOptions) -> HapticAnalysis {
    let extracted = extract_pattern(
        document,
        &options.event_durations,
        options.min_visual_duration,
    );

    // Only a document with nothing in it has no curve series. Patterns without intensity or
    // sharpness curves still sample as zeros over their duration.
    let curves = if document.items.is_empty() {
        Vec::new()
    } else {
        build_samples(
            &extracted.curves.intensity_curve,
            &extracted.curves.sharpness_curve,
            extracted.curves.duration,
            options.sample_count,
        )
    };
    let summary = summarize(&curves);
    let events = build_event_streams(
        &extracted.events,
        extracted.duration,
        options.sample_count,
        &options.event_durations,
    );

    HapticAnalysis {
        curves,
        summary,
        events,
        duration: extracted.duration,
        error: None,
    }
}

/// The haptic side of the visualizer: the pattern text being edited and its analysis.
pub struct HapticVisualizer {
    options: AnalysisOptions,
    text: String,
    /// The last analyzed text and its result.
    cache: Option<(String, Arc<HapticAnalysis>)>,
}

impl HapticVisualizer {
    /// Creates a visualizer showing the default pattern.
    pub fn new(options: AnalysisOptions) -> HapticVisualizer {
        HapticVisualizer {
            options,
            text: DEFAULT_PATTERN.to_string(),
            cache: None,
        }
    }

    /// Returns the current pattern text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the pattern text.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Goes back to the default pattern.
    pub fn reset(&mut self) {
        self.set_text(DEFAULT_PATTERN);
    }

    /// Returns the analysis of the current text, reusing the previous result if the text
    /// hasn't changed since.
    pub fn analysis(&mut self) -> Arc<HapticAnalysis> {
        if let Some((text, analysis)) = &self.cache {
            if *text == self.text {
                debug!("Using cached analysis");
                return Arc::clone(analysis);
            }
        }

        debug!(bytes = self.text.len(), "Analyzing pattern");
        let analysis = Arc::new(analyze_text(&self.text, &self.options));
        self.cache = Some((self.text.clone(), Arc::clone(&analysis)));
        analysis
    }

    /// Renders the sampled curves as CSV.
    pub fn curves_csv(&mut self) -> String {
        haptic_csv(&self.analysis().curves)
    }
}

impl Default for HapticVisualizer {
    fn default() -> Self {
        HapticVisualizer::new(AnalysisOptions::default())
    }
}

/// The audio side of the visualizer.
pub struct AudioView {
    decoder: Arc<dyn AudioDecoder>,
    max_points: usize,
    file_name: Option<String>,
    analysis: Option<AudioAnalysis>,
    error: Option<String>,
    loading: bool,
}

impl AudioView {
    /// Creates an empty view that decodes with the given decoder.
    pub fn new(decoder: Arc<dyn AudioDecoder>) -> AudioView {
        AudioView {
            decoder,
            max_points: DEFAULT_MAX_POINTS,
            file_name: None,
            analysis: None,
            error: None,
            loading: false,
        }
    }

    /// Sets the maximum number of retained waveform points.
    pub fn with_max_points(mut self, max_points: usize) -> AudioView {
        self.max_points = max_points;
        self
    }

    /// Handles an upload. Rejected or undecodable files leave an error and no waveform.
    pub async fn upload(&mut self, file_name: &str, bytes: Vec<u8>) {
        if let Err(e) = validate_upload(file_name) {
            self.error = Some(e.to_string());
            self.analysis = None;
            self.file_name = None;
            return;
        }

        self.loading = true;
        self.error = None;
        self.file_name = Some(file_name.to_string());

        match process_upload(self.decoder.clone(), file_name, bytes, self.max_points).await {
            Ok(analysis) => {
                info!(file_name, "Audio view updated");
                self.analysis = Some(analysis);
            }
            Err(e) => {
                error!(file_name, err = %e, "Unable to process audio upload");
                self.error = Some(e.to_string());
                self.analysis = None;
            }
        }
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn waveform(&self) -> &[AudioSample] {
        match &self.analysis {
            Some(analysis) => &analysis.waveform,
            None => &[],
        }
    }

    pub fn summary(&self) -> Option<&AudioSummary> {
        self.analysis.as_ref().map(|analysis| &analysis.summary)
    }

    /// Renders the waveform as CSV.
    pub fn waveform_csv(&self) -> String {
        audio_csv(self.waveform())
    }

    /// The file name a waveform download should use.
    pub fn csv_filename(&self) -> String {
        match &self.file_name {
            Some(file_name) => waveform_csv_filename(file_name, AUDIO_CSV_FILENAME),
            None => AUDIO_CSV_FILENAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::audio::mock::MockDecoder;
    use crate::audio::DecodedAudio;
    use crate::pattern::{HAPTIC_CONTINUOUS, HAPTIC_TRANSIENT};

    use super::*;

    #[test]
    fn default_pattern_analysis() {
        let mut visualizer = HapticVisualizer::default();
        let analysis = visualizer.analysis();

        assert!(analysis.error.is_none());
        assert_eq!(analysis.curves.len(), 601);
        assert_eq!(analysis.duration, 0.55);

        let summary = analysis.summary.unwrap();
        assert_eq!(summary.peak_intensity, 0.47);
        assert!((summary.sharpness_delta + 0.1).abs() < 1e-9);

        assert_eq!(analysis.events.len(), 1);
        let continuous = analysis.events.get(HAPTIC_CONTINUOUS).unwrap();
        assert_eq!(continuous.samples.len(), 601);
        assert!(continuous
            .samples
            .iter()
            .all(|sample| sample.intensity == 0.47));
    }

    #[test]
    fn unchanged_text_is_memoized() {
        let mut visualizer = HapticVisualizer::default();
        let first = visualizer.analysis();
        let second = visualizer.analysis();
        assert!(Arc::ptr_eq(&first, &second));

        visualizer.set_text(r#"{ "Pattern": [] }"#);
        let third = visualizer.analysis();
        assert!(!Arc::ptr_eq(&first, &third));

        // Setting the same text again still hits the cache.
        visualizer.set_text(r#"{ "Pattern": [] }"#);
        assert!(Arc::ptr_eq(&third, &visualizer.analysis()));
    }

    #[test]
    fn parse_error_clears_results() {
        let mut visualizer = HapticVisualizer::default();
        visualizer.set_text("{ \"Pattern\": [");
        let analysis = visualizer.analysis();

        assert!(analysis.error.is_some());
        assert!(analysis.curves.is_empty());
        assert!(analysis.summary.is_none());
        assert!(analysis.events.is_empty());
        assert_eq!(visualizer.curves_csv(), "time,intensity,sharpness");

        visualizer.reset();
        let analysis = visualizer.analysis();
        assert!(analysis.error.is_none());
        assert!(analysis.summary.is_some());
    }

    #[test]
    fn empty_pattern() {
        let analysis = analyze_text(
            r#"{ "Version": 1, "Pattern": [] }"#,
            &AnalysisOptions::default(),
        );

        assert!(analysis.error.is_none());
        assert!(analysis.curves.is_empty());
        assert!(analysis.summary.is_none());
        assert!(analysis.events.is_empty());
        assert_eq!(analysis.duration, 0.5);
    }

    #[test]
    fn event_only_pattern_uses_floor() {
        let analysis = analyze_text(
            r#"{ "Pattern": [ { "Event": { "Time": 0, "EventType": "HapticTransient",
                 "EventParameters": [ { "ParameterID": "HapticIntensity", "ParameterValue": 1 } ] } } ] }"#,
            &AnalysisOptions {
                sample_count: 50,
                ..Default::default()
            },
        );

        // 0.01 s of zero curve samples.
        assert_eq!(analysis.curves.len(), 51);
        assert_eq!(analysis.curves[50].time, 0.01);
        assert_eq!(analysis.duration, 0.5);
        let transient = analysis.events.get(HAPTIC_TRANSIENT).unwrap();
        assert_eq!(transient.samples.len(), 51);
        assert_eq!(transient.samples[1].intensity, 1.0);
        assert_eq!(transient.samples[2].time, 0.02);
        assert_eq!(transient.samples[2].intensity, 0.0);
    }

    #[test]
    fn patterns_without_known_curves_sample_zeros() {
        let analysis = analyze_text(
            r#"{ "Pattern": [ { "Event": { "Time": 0, "EventType": "HapticContinuous", "EventDuration": 0.3 } } ] }"#,
            &AnalysisOptions::default(),
        );

        assert_eq!(analysis.curves.len(), 601);
        assert_eq!(analysis.curves[0].time, 0.0);
        assert_eq!(analysis.curves[600].time, 0.3);
        assert!(analysis
            .curves
            .iter()
            .all(|point| point.intensity == 0.0 && point.sharpness == 0.0));
        let summary = analysis.summary.unwrap();
        assert_eq!(summary.peak_intensity, 0.0);
        assert_eq!(summary.area, 0.0);

        // Curves with other parameter IDs still set the span.
        let analysis = analyze_text(
            r#"{ "Pattern": [ { "ParameterCurve": { "ParameterID": "HapticAttackTimeControl",
                 "ParameterCurveControlPoints": [ { "Time": 0, "ParameterValue": 0 },
                                                  { "Time": 2, "ParameterValue": 1 } ] } } ] }"#,
            &AnalysisOptions::default(),
        );
        assert_eq!(analysis.curves.len(), 601);
        assert_eq!(analysis.curves[600].time, 2.0);
        assert_eq!(analysis.summary.unwrap().peak_intensity, 0.0);
    }

    #[test]
    fn options_change_results() {
        let options = AnalysisOptions {
            sample_count: 10,
            event_durations: EventDurationDefaults::new(0.3, 0.1),
            min_visual_duration: 1.0,
        };
        let analysis = analyze_text(
            r#"{ "Pattern": [ { "Event": { "Time": 0, "EventType": "HapticTransient",
                 "EventParameters": [ { "ParameterID": "HapticIntensity", "ParameterValue": 1 } ] } } ] }"#,
            &options,
        );

        assert_eq!(analysis.duration, 1.0);
        let transient = analysis.events.get(HAPTIC_TRANSIENT).unwrap();
        assert_eq!(transient.samples.len(), 11);
        assert_eq!(transient.samples[3].intensity, 1.0);
        assert_eq!(transient.samples[4].intensity, 0.0);
    }

    #[tokio::test]
    async fn audio_upload_flow() {
        let decoder = Arc::new(MockDecoder::returning(DecodedAudio::new(
            vec![0.5; 44100],
            44100,
        )));
        let mut view = AudioView::new(decoder.clone());
        assert_eq!(view.csv_filename(), "audio_waveform.csv");

        view.upload("Kick.WAV", vec![0; 44]).await;
        assert!(!view.is_loading());
        assert!(view.error().is_none());
        assert_eq!(view.file_name(), Some("Kick.WAV"));
        assert_eq!(view.summary().unwrap().total_samples, 44100);
        assert!(view.waveform().len() <= 2000);
        assert_eq!(view.csv_filename(), "Kick_waveform.csv");
        assert!(view.waveform_csv().starts_with("time,amplitude\n0,0.5"));

        // A rejected file never reaches the decoder and clears the previous result.
        view.upload("notes.txt", vec![0; 4]).await;
        assert_eq!(view.error(), Some("Please upload a .wav file"));
        assert!(view.summary().is_none());
        assert!(view.waveform().is_empty());
        assert_eq!(view.file_name(), None);
        assert_eq!(view.csv_filename(), "audio_waveform.csv");
        assert_eq!(decoder.calls(), 1);
    }

    #[tokio::test]
    async fn audio_decode_failure_clears_view() {
        let good = Arc::new(MockDecoder::returning(DecodedAudio::new(vec![0.1; 100], 100)));
        let mut view = AudioView::new(good).with_max_points(10);
        view.upload("a.wav", vec![0; 4]).await;
        assert_eq!(view.waveform().len(), 10);

        view.decoder = Arc::new(MockDecoder::failing("Unable to decode audio data"));
        view.upload("b.wav", vec![0; 4]).await;
        assert_eq!(view.error(), Some("Unable to decode audio data"));
        assert!(view.waveform().is_empty());
        assert!(view.summary().is_none());
        assert_eq!(view.file_name(), Some("b.wav"));
    }
}
