//! Integration tests for livecap
//!
//! Drives the transcript core (router + store + renderer) with scripted
//! recognition result streams and checks the rendered output and the final
//! transcript.

use livecap::config::{PresentationMode, TranscriptConfig};
use livecap::session::RecognitionResult;
use livecap::{ResultRouter, TextNormalizer, TranscriptStore, ViewportRenderer};

fn build_router(
    mode: PresentationMode,
    width: usize,
    remove_fillers: bool,
) -> ResultRouter<Vec<u8>> {
    let normalizer = TextNormalizer::new(&TranscriptConfig { remove_fillers });
    let store = TranscriptStore::new(normalizer.clone());
    let renderer = ViewportRenderer::new(Vec::new(), mode, true);
    ResultRouter::new(normalizer, store, renderer, width)
}

fn result(text: &str, is_final: bool) -> RecognitionResult {
    RecognitionResult {
        text: text.to_string(),
        is_final,
    }
}

fn feed(router: &mut ResultRouter<Vec<u8>>, results: &[RecognitionResult]) {
    for r in results {
        router.handle(r).expect("handling a result failed");
    }
}

#[test]
fn test_streaming_session_transcript() {
    // Interim results refine, and the second final re-sends the first with
    // more words appended; only the new tail lands in the store.
    let mut router = build_router(PresentationMode::MultiLineWrap, 80, true);

    feed(
        &mut router,
        &[
            result("testing um one", false),
            result("testing one", true),
            result("two three", false),
            result("testing one two three", true),
        ],
    );

    assert_eq!(router.committed_segments(), 2);
    assert_eq!(router.finish().unwrap(), "testing one two three");
}

#[test]
fn test_duplicate_final_retransmission() {
    let mut router = build_router(PresentationMode::MultiLineWrap, 80, true);

    feed(
        &mut router,
        &[
            result("hello there", true),
            result("hello there", true),
            result("general", true),
        ],
    );

    assert_eq!(router.committed_segments(), 2);
    assert_eq!(router.finish().unwrap(), "hello there general");
}

#[test]
fn test_interim_never_accumulates() {
    let mut router = build_router(PresentationMode::MultiLineWrap, 80, true);

    feed(
        &mut router,
        &[
            result("one", false),
            result("one two", false),
            result("one two three", false),
        ],
    );

    let written = String::from_utf8_lossy(router.renderer().get_ref()).into_owned();
    // Each interim fully replaces the previous one; nothing is concatenated.
    assert!(!written.contains("one one"));
    assert!(written.contains("one two three"));
    assert_eq!(router.finish().unwrap(), "");
}

#[test]
fn test_empty_stream_yields_empty_transcript() {
    let router = build_router(PresentationMode::SingleLineTail, 40, true);
    assert_eq!(router.finish().unwrap(), "");
}

#[test]
fn test_filler_removal_disabled_end_to_end() {
    let mut router = build_router(PresentationMode::MultiLineWrap, 80, false);

    feed(&mut router, &[result("um, I think this works", true)]);

    assert_eq!(router.finish().unwrap(), "um, I think this works");
}

#[test]
fn test_tail_mode_keeps_most_recent_words() {
    let mut router = build_router(PresentationMode::SingleLineTail, 20, true);

    feed(
        &mut router,
        &[
            result("the beginning of a very long sentence", true),
            result("that keeps on going", false),
        ],
    );

    let written = String::from_utf8_lossy(router.renderer().get_ref()).into_owned();
    let last_line = written.rsplit('\r').find(|s| !s.is_empty()).unwrap();
    let view = last_line.trim_start_matches("\x1b[K");

    assert!(view.chars().count() <= 18);
    assert!(view.starts_with('…'));
    assert!(view.ends_with("going"));
}

#[test]
fn test_final_render_drops_interim_tail() {
    let mut router = build_router(PresentationMode::MultiLineWrap, 80, true);

    feed(
        &mut router,
        &[
            result("hello wor", false),
            result("hello world", true),
        ],
    );

    let written = String::from_utf8_lossy(router.renderer().get_ref()).into_owned();
    // The final redraw must not keep the provisional tail around.
    assert!(!written.contains("hello world hello wor"));
    assert_eq!(router.finish().unwrap(), "hello world");
}
