use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use web_time::Duration;

use trellis_core::viewport::{MAX_ZOOM, MIN_ZOOM, auto_zoom};
use trellis_core::{
    App, AppEvent, Document, EditorSurface, ManualClock, MemoryStore, Pane, PlaygroundConfig,
    Size, ViewportPreset, Zoom, export_file, parse_standalone,
};

fn fragments(parts: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(parts), 0..8).prop_map(|v| v.concat())
}

fn document() -> impl Strategy<Value = Document> {
    let markup = fragments(&[
        "<p>",
        "</p>",
        "hello",
        " ",
        "\n",
        "<script>run()</script>",
        "<SCRIPT src=\"x.js\"></SCRIPT>",
        "</style>",
        "<style>b{}</style>",
        "&lt;/script&gt;",
        "<!-- <script> -->",
        "<script>",
        "é",
    ]);
    let styling = fragments(&[
        "a{color:red}",
        "</style>",
        "</STYLE>",
        "<script>",
        "content:'</script>';",
        "\n",
        "/* x */",
    ]);
    let scripting = fragments(&[
        "let a = 1;",
        "'</script>'",
        "\"</SCRIPT>\"",
        "'<script>'",
        "</style>",
        "\n",
        "if (a < b) {}",
    ]);
    (markup, styling, scripting).prop_map(|(m, s, j)| Document::new(m, s, j))
}

#[derive(Debug, Clone)]
enum Op {
    Tick,
    Toggle,
    Edit(String),
    Wait(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Tick),
        1 => Just(Op::Toggle),
        2 => "[a-z]{0,6}".prop_map(Op::Edit),
        2 => (0u64..60).prop_map(Op::Wait),
    ]
}

proptest! {
    #[test]
    fn exported_file_reloads_to_the_same_buffers(doc in document()) {
        let file = export_file(&doc);
        prop_assert_eq!(parse_standalone(&file.contents).unwrap(), doc);
    }

    #[test]
    fn zoom_is_always_in_range(value in any::<f64>(), position in any::<f64>()) {
        for zoom in [Zoom::new(value), Zoom::from_slider(position)] {
            prop_assert!(zoom.get() >= MIN_ZOOM && zoom.get() <= MAX_ZOOM);
        }
    }

    #[test]
    fn auto_zoom_is_in_range_and_never_enlarges(
        preset in prop::sample::select(ViewportPreset::ALL.to_vec()),
        width in -100.0f64..10_000.0,
        height in -100.0f64..10_000.0,
    ) {
        let zoom = auto_zoom(preset, Size::new(width, height), 64.0).get();
        prop_assert!((MIN_ZOOM..=1.0).contains(&zoom));
    }

    #[test]
    fn recent_saves_stay_bounded_and_newest_first(ops in prop::collection::vec(op(), 0..40)) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut app = App::with_clock(
            PlaygroundConfig::default(),
            EditorSurface::plain(&Document::default()),
            MemoryStore::new(),
            Box::new(clock.clone()),
        );
        app.start(None);

        for op in ops {
            match op {
                Op::Tick => {
                    app.dispatch(AppEvent::AutosaveTick);
                }
                Op::Toggle => {
                    app.dispatch(AppEvent::ToggleAutosave);
                }
                Op::Edit(text) => {
                    app.dispatch(AppEvent::SetText { pane: Pane::Markup, text });
                }
                Op::Wait(secs) => clock.advance(Duration::from_secs(secs)),
            }
            let recent = app.store().list_recent();
            prop_assert!(recent.len() <= 5);
            prop_assert!(recent.windows(2).all(|w| w[0].saved_at >= w[1].saved_at));
        }
    }
}
