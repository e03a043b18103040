// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — persistent app configuration.

use std::path::PathBuf;

use dioxus::prelude::*;
use khotiyan_core::{OutputFormat, PaperSize, PdfPageLayout, Quality};

use crate::components::error_text;
use crate::services::app_services::AppServices;
use crate::state::AppState;

const PAPER_SIZES: [PaperSize; 5] = [
    PaperSize::A4,
    PaperSize::A3,
    PaperSize::A5,
    PaperSize::Letter,
    PaperSize::Legal,
];

const DEFAULT_MARGIN_MM: f32 = 10.0;

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut save_msg = use_signal(|| Option::<String>::None);

    let config = state.read().config.clone();
    let layout = config.pdf_page_layout;
    let pdfium_path = path_text(&config.pdfium_library_path);
    let model_path = path_text(&config.matting_model_path);

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Convert" }
                FieldRow { label: "Default format",
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{config.default_convert_format.extension()}",
                        onchange: move |evt| {
                            if let Some(f) = OutputFormat::from_extension(&evt.value()) {
                                state.write().config.default_convert_format = f;
                            }
                        },
                        for f in OutputFormat::ALL {
                            option { value: "{f.extension()}", "{f.label()}" }
                        }
                    }
                }
                FieldRow { label: "Default quality",
                    QualityInput {
                        value: config.default_quality,
                        on_change: move |q| state.write().config.default_quality = q,
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Compress" }
                FieldRow { label: "Target size (MB)",
                    input {
                        r#type: "number",
                        min: "0.1",
                        max: "5",
                        step: "0.1",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.compress_max_size_mb}",
                        onchange: move |evt| {
                            if let Ok(mb) = evt.value().parse::<f32>()
                                && (0.1..=5.0).contains(&mb)
                            {
                                state.write().config.compress_max_size_mb = mb;
                            }
                        },
                    }
                }
                FieldRow { label: "Longest side (px)",
                    input {
                        r#type: "number",
                        min: "1",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.compress_max_dimension}",
                        onchange: move |evt| {
                            if let Ok(px) = evt.value().parse::<u32>()
                                && px > 0
                            {
                                state.write().config.compress_max_dimension = px;
                            }
                        },
                    }
                }
                FieldRow { label: "Starting quality",
                    QualityInput {
                        value: config.compress_initial_quality,
                        on_change: move |q| state.write().config.compress_initial_quality = q,
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "PDF" }
                FieldRow { label: "Page render scale",
                    input {
                        r#type: "number",
                        min: "1",
                        max: "4",
                        step: "0.5",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.pdf_render_scale}",
                        onchange: move |evt| {
                            if let Ok(scale) = evt.value().parse::<f32>()
                                && (1.0..=4.0).contains(&scale)
                            {
                                state.write().config.pdf_render_scale = scale;
                            }
                        },
                    }
                }
                FieldRow { label: "Page image format",
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{config.pdf_render_format.extension()}",
                        onchange: move |evt| {
                            if let Some(f) = OutputFormat::from_extension(&evt.value())
                                && matches!(f, OutputFormat::Png | OutputFormat::Jpeg)
                            {
                                state.write().config.pdf_render_format = f;
                            }
                        },
                        option { value: "png", "PNG" }
                        option { value: "jpeg", "JPEG" }
                    }
                }
                FieldRow { label: "Images to PDF pages",
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{layout_mode(&layout)}",
                        onchange: move |evt| {
                            let mut s = state.write();
                            s.config.pdf_page_layout = with_mode(s.config.pdf_page_layout, &evt.value());
                        },
                        option { value: "fit", "Fit each image" }
                        option { value: "paper", "Fixed paper size" }
                    }
                }
                FieldRow { label: "Paper size",
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{layout_paper(&layout).label()}",
                        onchange: move |evt| {
                            if let Some(size) = PaperSize::from_label(&evt.value()) {
                                let mut s = state.write();
                                s.config.pdf_page_layout = with_paper(s.config.pdf_page_layout, size);
                            }
                        },
                        for size in PAPER_SIZES {
                            option { value: "{size.label()}", "{size.label()}" }
                        }
                    }
                }
                if let PdfPageLayout::Paper { margin_mm, .. } = layout {
                    FieldRow { label: "Margin (mm)",
                        input {
                            r#type: "number",
                            min: "0",
                            style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                            value: "{margin_mm}",
                            onchange: move |evt| {
                                if let Ok(mm) = evt.value().parse::<f32>()
                                    && mm >= 0.0
                                {
                                    let mut s = state.write();
                                    if let PdfPageLayout::Paper { size, .. } = s.config.pdf_page_layout {
                                        s.config.pdf_page_layout = PdfPageLayout::Paper { size, margin_mm: mm };
                                    }
                                }
                            },
                        }
                    }
                }
                FieldRow { label: "pdfium library",
                    input {
                        r#type: "text",
                        placeholder: "bundled or system",
                        style: "width: 260px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{pdfium_path}",
                        onchange: move |evt| state.write().config.pdfium_library_path = parse_path(&evt.value()),
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Background Removal" }
                FieldRow { label: "Colour tolerance",
                    input {
                        r#type: "number",
                        min: "0",
                        max: "442",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.background_tolerance}",
                        onchange: move |evt| {
                            if let Ok(t) = evt.value().parse::<f32>()
                                && t >= 0.0
                            {
                                state.write().config.background_tolerance = t;
                            }
                        },
                    }
                }
                FieldRow { label: "Edge feather",
                    input {
                        r#type: "number",
                        min: "0",
                        step: "0.5",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.background_feather}",
                        onchange: move |evt| {
                            if let Ok(sigma) = evt.value().parse::<f32>()
                                && sigma >= 0.0
                            {
                                state.write().config.background_feather = sigma;
                            }
                        },
                    }
                }
                FieldRow { label: "Matting model (.rten)",
                    input {
                        r#type: "text",
                        placeholder: "built-in remover",
                        style: "width: 260px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{model_path}",
                        onchange: move |evt| state.write().config.matting_model_path = parse_path(&evt.value()),
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "History" }
                SettingRow {
                    label: "Show saved results on the home page",
                    checked: config.keep_history,
                    on_toggle: move |v: bool| {
                        let mut s = state.write();
                        s.config.keep_history = v;
                        if !v {
                            s.clear_history();
                        }
                    },
                }
            }

            // Save button
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                save_msg.set(Some("Settings saved.".into()));
                            }
                            Err(e) => save_msg.set(Some(error_text(&e))),
                        }
                    }
                },
                "Save Settings"
            }
            if let Some(ref msg) = *save_msg.read() {
                p { style: "color: #34c759; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Khotiyan v0.3.0"
                    br {}
                    "Offline image and PDF toolkit"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn FieldRow(label: &'static str, children: Element) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            {children}
        }
    }
}

#[component]
fn SettingRow(label: &'static str, checked: bool, on_toggle: EventHandler<bool>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "checkbox",
                checked: checked,
                onchange: move |evt| {
                    on_toggle.call(evt.checked());
                },
            }
        }
    }
}

/// Percentage input backed by a [`Quality`].
#[component]
fn QualityInput(value: Quality, on_change: EventHandler<Quality>) -> Element {
    rsx! {
        input {
            r#type: "number",
            min: "1",
            max: "100",
            style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
            value: "{value.to_percent()}",
            onchange: move |evt| {
                if let Ok(percent) = evt.value().parse::<f32>()
                    && let Ok(q) = Quality::new(percent / 100.0)
                {
                    on_change.call(q);
                }
            },
        }
    }
}

fn path_text(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn parse_path(text: &str) -> Option<PathBuf> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

fn layout_mode(layout: &PdfPageLayout) -> &'static str {
    match layout {
        PdfPageLayout::FitImage { .. } => "fit",
        PdfPageLayout::Paper { .. } => "paper",
    }
}

fn layout_paper(layout: &PdfPageLayout) -> PaperSize {
    match layout {
        PdfPageLayout::FitImage { max } => *max,
        PdfPageLayout::Paper { size, .. } => *size,
    }
}

/// Switch layout mode, keeping the chosen paper size.
fn with_mode(layout: PdfPageLayout, mode: &str) -> PdfPageLayout {
    let size = layout_paper(&layout);
    match (mode, layout) {
        ("paper", PdfPageLayout::FitImage { .. }) => PdfPageLayout::Paper {
            size,
            margin_mm: DEFAULT_MARGIN_MM,
        },
        ("fit", PdfPageLayout::Paper { .. }) => PdfPageLayout::FitImage { max: size },
        _ => layout,
    }
}

fn with_paper(layout: PdfPageLayout, size: PaperSize) -> PdfPageLayout {
    match layout {
        PdfPageLayout::FitImage { .. } => PdfPageLayout::FitImage { max: size },
        PdfPageLayout::Paper { margin_mm, .. } => PdfPageLayout::Paper { size, margin_mm },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_mode_keeps_paper() {
        let fit = PdfPageLayout::FitImage {
            max: PaperSize::Letter,
        };
        let paper = with_mode(fit, "paper");
        assert_eq!(
            paper,
            PdfPageLayout::Paper {
                size: PaperSize::Letter,
                margin_mm: DEFAULT_MARGIN_MM
            }
        );
        assert_eq!(with_mode(paper, "fit"), fit);
        assert_eq!(with_mode(fit, "fit"), fit);
        assert_eq!(with_mode(fit, "bogus"), fit);
    }

    #[test]
    fn paper_change_keeps_margin() {
        let layout = PdfPageLayout::Paper {
            size: PaperSize::A4,
            margin_mm: 5.0,
        };
        assert_eq!(
            with_paper(layout, PaperSize::Legal),
            PdfPageLayout::Paper {
                size: PaperSize::Legal,
                margin_mm: 5.0
            }
        );
        assert_eq!(layout_paper(&with_paper(PdfPageLayout::default(), PaperSize::A5)), PaperSize::A5);
    }

    #[test]
    fn blank_path_clears_setting() {
        assert_eq!(parse_path("   "), None);
        assert_eq!(parse_path(" /opt/pdfium "), Some(PathBuf::from("/opt/pdfium")));
        assert_eq!(path_text(&None), "");
    }
}
