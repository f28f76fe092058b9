//! Integration tests for the render backends.

use nodecut_core::{AudioParams, ChannelLayout, RationalTime, SampleFormat, TimeRange};
use nodecut_graph::{MediaAudio, NodeGraph, NodeId, ParamValue, ViewerOutput};
use nodecut_media::{DecoderRegistry, Footage, StreamKind};
use nodecut_render::AudioRenderBackend;
use std::sync::Arc;

fn init_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn seconds(n: i64) -> RationalTime {
    RationalTime::new(n, 1)
}

fn range(start: i64, end: i64) -> TimeRange {
    TimeRange::new(seconds(start), seconds(end))
}

/// Graph with a two-second tone feeding a viewer.
fn tone_graph(duration: RationalTime) -> (NodeGraph, NodeId) {
    let mut graph = NodeGraph::new();
    let audio = graph.add_node(Box::new(MediaAudio::new()));
    let viewer = graph.add_node(Box::new(ViewerOutput::new()));
    let footage = Arc::new(
        Footage::new("tone.test", "pattern").with_stream(StreamKind::Audio, Some(duration)),
    );
    graph
        .set_input(audio, "footage", ParamValue::Footage(footage))
        .unwrap();
    graph.connect(audio, "samples", viewer, "samples").unwrap();
    (graph, viewer)
}

#[test]
fn adjacent_invalidations_merge() {
    let mut backend = AudioRenderBackend::new(AudioParams::default(), seconds(20));
    let registry = DecoderRegistry::with_defaults();
    let (mut graph, viewer) = tone_graph(seconds(1));
    backend
        .render_dirty(&mut graph, viewer, &registry, None)
        .unwrap();
    assert!(backend.dirty_ranges().is_empty());

    backend.invalidate_cache(range(5, 10));
    backend.invalidate_cache(range(10, 15));
    assert_eq!(backend.dirty_ranges(), vec![range(5, 15)]);
}

#[test]
fn disjoint_invalidations_stay_separate() {
    let mut backend = AudioRenderBackend::new(AudioParams::default(), seconds(20));
    let registry = DecoderRegistry::with_defaults();
    let (mut graph, viewer) = tone_graph(seconds(1));
    backend
        .render_dirty(&mut graph, viewer, &registry, None)
        .unwrap();

    backend.invalidate_cache(range(1, 3));
    backend.invalidate_cache(range(8, 9));
    assert_eq!(backend.dirty_ranges(), vec![range(1, 3), range(8, 9)]);
}

#[test]
fn render_writes_tone_and_clears_dirty() {
    init_logs();
    let mut backend = AudioRenderBackend::new(AudioParams::default(), seconds(2));
    let (mut graph, viewer) = tone_graph(seconds(2));
    let registry = DecoderRegistry::with_defaults();

    let rendered = backend
        .render_dirty(&mut graph, viewer, &registry, None)
        .unwrap();
    assert_eq!(rendered, 1);
    assert!(backend.dirty_ranges().is_empty());
    assert!(backend.pcm().iter().any(|&b| b != 0));
}

#[test]
fn time_past_footage_renders_silence() {
    let mut backend = AudioRenderBackend::new(AudioParams::default(), seconds(4));
    // Footage covers only the first second of a four-second span
    let (mut graph, viewer) = tone_graph(seconds(1));
    let registry = DecoderRegistry::with_defaults();

    backend
        .render_dirty(&mut graph, viewer, &registry, None)
        .unwrap();

    let params = backend.params();
    let tail = &backend.pcm()[params.time_to_bytes(seconds(2))..];
    assert!(tail.iter().all(|&b| b == 0));
}

#[test]
fn cache_id_is_deterministic_and_parameter_sensitive() {
    let (graph, _) = tone_graph(seconds(1));
    let a = AudioRenderBackend::new(AudioParams::default(), seconds(1));
    let b = AudioRenderBackend::new(AudioParams::default(), seconds(1));
    assert_eq!(a.cache_id(&graph), b.cache_id(&graph));

    let mut c = AudioRenderBackend::new(AudioParams::default(), seconds(1));
    c.set_parameters(AudioParams::new(
        44100,
        ChannelLayout::Stereo,
        SampleFormat::F32,
    ))
    .unwrap();
    assert_ne!(a.cache_id(&graph), c.cache_id(&graph));
}

#[test]
fn structural_edit_changes_cache_id() {
    let (mut graph, _) = tone_graph(seconds(1));
    let backend = AudioRenderBackend::new(AudioParams::default(), seconds(1));

    let before = backend.cache_id(&graph);
    graph.add_node(Box::new(MediaAudio::new()));
    assert_ne!(before, backend.cache_id(&graph));
}

#[test]
fn cancellation_preserves_dirty_ranges() {
    init_logs();
    let mut backend = AudioRenderBackend::new(AudioParams::default(), seconds(2));
    let (mut graph, viewer) = tone_graph(seconds(2));
    let registry = DecoderRegistry::with_defaults();

    let (tx, rx) = crossbeam_channel::bounded(1);
    tx.send(()).unwrap();

    let rendered = backend
        .render_dirty(&mut graph, viewer, &registry, Some(&rx))
        .unwrap();
    assert_eq!(rendered, 0);
    assert_eq!(backend.dirty_ranges(), vec![range(0, 2)]);

    // The backend is stopped again and a later render completes
    backend
        .render_dirty(&mut graph, viewer, &registry, None)
        .unwrap();
    assert!(backend.dirty_ranges().is_empty());
}

#[test]
fn rerender_after_invalidation_is_consistent() {
    let mut backend = AudioRenderBackend::new(AudioParams::default(), seconds(2));
    let (mut graph, viewer) = tone_graph(seconds(2));
    let registry = DecoderRegistry::with_defaults();

    backend
        .render_dirty(&mut graph, viewer, &registry, None)
        .unwrap();
    let first = backend.pcm().to_vec();

    backend.invalidate_cache(range(0, 1));
    backend
        .render_dirty(&mut graph, viewer, &registry, None)
        .unwrap();
    assert_eq!(backend.pcm(), &first[..]);
}
