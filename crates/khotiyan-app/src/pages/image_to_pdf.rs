// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image to PDF page — queue images, order them, build one PDF.

use dioxus::prelude::*;
use khotiyan_core::error::KhotiyanError;
use khotiyan_core::naming::{IMAGES_TO_PDF_NAME, format_kb};
use khotiyan_core::{PdfPageLayout, ToolKind};
use khotiyan_document::{ImageSequence, PdfWriter};

use crate::components::{ActionButton, PickArea, StatusLine, ToolHeader, error_text};
use crate::services::app_services::{AppServices, run_blocking};
use crate::services::files::{self, Accept, PickedFile};
use crate::state::AppState;

fn layout_summary(layout: &PdfPageLayout) -> String {
    match layout {
        PdfPageLayout::FitImage { max } => {
            format!("One page per image, sized to the image (at most {})", max.label())
        }
        PdfPageLayout::Paper { size, margin_mm } => {
            format!("{} pages with {margin_mm} mm margins", size.label())
        }
    }
}

#[component]
pub fn ImageToPdf() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let mut images = use_signal(ImageSequence::new);
    let mut pdf = use_signal(|| Option::<Vec<u8>>::None);
    let mut busy = use_signal(|| false);
    let mut status = use_signal(|| Option::<String>::None);

    let layout = state.read().config.pdf_page_layout;
    let create_label = if busy() { "Creating PDF..." } else { "Create PDF" };

    let thumbs = use_memo(move || {
        images
            .read()
            .iter()
            .map(|image| files::data_url(&image.bytes))
            .collect::<Vec<_>>()
    });

    let mut add_images = move |picked: Vec<PickedFile>| {
        if picked.is_empty() {
            return;
        }
        let offered = picked.len();
        let accepted = images
            .write()
            .extend_filtered(picked.into_iter().map(|file| (file.name, file.bytes)));
        pdf.set(None);
        if accepted < offered {
            status.set(Some(format!(
                "Skipped {} file(s) that are not images",
                offered - accepted
            )));
        } else {
            status.set(None);
        }
    };

    rsx! {
        div {
            ToolHeader { tool: ToolKind::ImageToPdf }

            if images.read().is_empty() {
                PickArea {
                    label: "Choose images",
                    hint: "Select several at once; each becomes one page",
                    accept: Accept::Images,
                    onpick: move |picked: Vec<PickedFile>| add_images(picked),
                    onerror: move |e: KhotiyanError| status.set(Some(error_text(&e))),
                }
            } else {
                p { style: "color: #666;",
                    "{images.read().len()} image(s) \u{00B7} {format_kb(images.read().total_bytes())} \u{00B7} {layout_summary(&layout)}"
                }

                for (index, image) in images.read().iter().enumerate() {
                    div { key: "{index}-{image.name}",
                        style: "display: flex; align-items: center; gap: 12px; padding: 8px; margin: 6px 0; border: 1px solid #e0e0e0; border-radius: 8px; background: white;",
                        span { style: "color: #999; width: 24px; text-align: right;", "{index + 1}" }
                        img { src: thumbs.read().get(index).cloned().unwrap_or_default(), style: "width: 56px; height: 56px; object-fit: cover; border-radius: 4px;" }
                        div { style: "flex: 1;",
                            div { "{image.name}" }
                            div { style: "color: #888; font-size: 13px;", "{format_kb(image.byte_len)}" }
                        }
                        button {
                            style: "padding: 4px 8px;",
                            title: "Move up",
                            disabled: index == 0,
                            onclick: move |_| {
                                if images.write().move_up(index) {
                                    pdf.set(None);
                                }
                            },
                            "\u{2191}"
                        }
                        button {
                            style: "padding: 4px 8px;",
                            title: "Move down",
                            disabled: index + 1 == images.read().len(),
                            onclick: move |_| {
                                if images.write().move_down(index) {
                                    pdf.set(None);
                                }
                            },
                            "\u{2193}"
                        }
                        button {
                            style: "padding: 4px 8px; color: #d32f2f;",
                            title: "Remove",
                            onclick: move |_| {
                                images.write().remove(index);
                                pdf.set(None);
                            },
                            "\u{2715}"
                        }
                    }
                }

                div { style: "display: flex; gap: 8px; margin-top: 16px;",
                    ActionButton {
                        label: create_label,
                        disabled: busy(),
                        onclick: move |_| {
                            let queued = images.read().clone();
                            busy.set(true);
                            status.set(None);
                            spawn(async move {
                                let built = run_blocking(move || {
                                    PdfWriter::new(layout).create_from_images(&queued)
                                })
                                .await;
                                match built {
                                    Ok(bytes) => {
                                        status.set(Some(format!("PDF ready \u{00B7} {}", format_kb(bytes.len() as u64))));
                                        pdf.set(Some(bytes));
                                    }
                                    Err(e) => status.set(Some(error_text(&e))),
                                }
                                busy.set(false);
                            });
                        },
                    }
                    ActionButton {
                        label: "Add More",
                        secondary: true,
                        onclick: move |_| match Accept::Images.pick() {
                            Ok(picked) => add_images(picked),
                            Err(e) => status.set(Some(error_text(&e))),
                        },
                    }
                    ActionButton {
                        label: "Clear",
                        secondary: true,
                        onclick: move |_| {
                            images.write().clear();
                            pdf.set(None);
                            status.set(None);
                        },
                    }
                }

                if let Some(bytes) = pdf() {
                    div { style: "margin-top: 16px;",
                        ActionButton {
                            label: "Save PDF",
                            onclick: {
                                let svc = svc.clone();
                                move |_| match svc.save_output(ToolKind::ImageToPdf, IMAGES_TO_PDF_NAME, &bytes) {
                                    Ok(Some(record)) => {
                                        status.set(Some(format!("Saved {}", record.file_name)));
                                        state.write().record(record);
                                    }
                                    Ok(None) => {}
                                    Err(e) => status.set(Some(error_text(&e))),
                                }
                            },
                        }
                    }
                }
            }

            StatusLine { message: status() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khotiyan_core::PaperSize;

    #[test]
    fn layout_summaries() {
        assert_eq!(
            layout_summary(&PdfPageLayout::default()),
            "One page per image, sized to the image (at most A4)"
        );
        let paper = PdfPageLayout::Paper {
            size: PaperSize::Letter,
            margin_mm: 10.0,
        };
        assert_eq!(layout_summary(&paper), "Letter pages with 10 mm margins");
    }
}
