use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Style applied to every span that opts into a progress bar with
/// `indicatif.pb_show = true`.
pub fn span_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {span_name} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS)
}

pub fn set_stage(span: &Span, stage: &str) {
    span.pb_set_message(stage);
}
