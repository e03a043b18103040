// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF to Image page — render every page of a PDF to PNG or JPEG.

use dioxus::prelude::*;
use khotiyan_core::error::KhotiyanError;
use khotiyan_core::naming::format_kb;
use khotiyan_core::{OutputFormat, ToolKind};
use khotiyan_document::pdf::raster::{MAX_SCALE, MIN_SCALE, SCALE_STEP};
use khotiyan_document::{PdfReader, RenderSettings, RenderedPage};

use crate::components::{ActionButton, PickArea, Preview, StatusLine, ToolHeader, error_text};
use crate::services::app_services::{AppServices, run_blocking};
use crate::services::files::{self, Accept, PickedFile};
use crate::state::AppState;

/// Formats offered for rendered pages.
const PAGE_FORMATS: [OutputFormat; 2] = [OutputFormat::Png, OutputFormat::Jpeg];

#[component]
pub fn PdfToImage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let mut source = use_signal(|| Option::<(PickedFile, usize)>::None);
    let mut scale = use_signal(|| state.peek().config.pdf_render_scale);
    let mut format = use_signal(|| state.peek().config.pdf_render_format);
    let mut pages = use_signal(Vec::<RenderedPage>::new);
    let mut busy = use_signal(|| false);
    let mut status = use_signal(|| Option::<String>::None);

    let mut reset = move || {
        source.set(None);
        pages.set(Vec::new());
        status.set(None);
    };

    let render_label = if busy() { "Rendering..." } else { "Convert to Images" };

    let save_all = {
        let svc = svc.clone();
        move |_: MouseEvent| {
            let outputs: Vec<(String, Vec<u8>)> = pages
                .read()
                .iter()
                .map(|page| (page.file_name(), page.bytes.clone()))
                .collect();
            match svc.save_all(ToolKind::PdfToImage, &outputs) {
                Ok(records) if records.is_empty() => {}
                Ok(records) => {
                    status.set(Some(format!("Saved {} pages", records.len())));
                    let mut state = state.write();
                    for record in records {
                        state.record(record);
                    }
                }
                Err(e) => status.set(Some(error_text(&e))),
            }
        }
    };

    rsx! {
        div {
            ToolHeader { tool: ToolKind::PdfToImage }

            if let Some((file, page_count)) = source() {
                div { style: "padding: 12px 16px; border: 1px solid #e0e0e0; border-radius: 8px; background: white;",
                    strong { "{file.name}" }
                    p { style: "color: #666; font-size: 13px; margin: 4px 0 0;",
                        "{page_count} page(s) \u{00B7} {format_kb(file.byte_len())}"
                    }
                }

                div { style: "display: flex; gap: 16px; align-items: center; flex-wrap: wrap; margin: 16px 0;",
                    label { "Scale {scale():.1}x "
                        input {
                            r#type: "range",
                            min: "{MIN_SCALE}",
                            max: "{MAX_SCALE}",
                            step: "{SCALE_STEP}",
                            value: "{scale()}",
                            oninput: move |evt| {
                                if let Ok(value) = evt.value().parse::<f32>() {
                                    scale.set(value);
                                    pages.set(Vec::new());
                                }
                            },
                        }
                    }
                    label { "Format "
                        select {
                            style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                            value: "{format().extension()}",
                            onchange: move |evt| {
                                if let Some(f) = OutputFormat::from_extension(&evt.value()) {
                                    format.set(f);
                                    pages.set(Vec::new());
                                }
                            },
                            for f in PAGE_FORMATS {
                                option { value: "{f.extension()}", "{f.label()}" }
                            }
                        }
                    }
                }

                div { style: "display: flex; gap: 8px;",
                    ActionButton {
                        label: render_label,
                        disabled: busy(),
                        onclick: {
                            let svc = svc.clone();
                            let pdf = file.bytes.clone();
                            move |_| {
                                let svc = svc.clone();
                                let pdf = pdf.clone();
                                let settings = RenderSettings {
                                    scale: scale(),
                                    format: format(),
                                    ..RenderSettings::default()
                                };
                                busy.set(true);
                                status.set(None);
                                spawn(async move {
                                    let rendered = run_blocking(move || {
                                        svc.rasterizer()?.render(&pdf, &settings)
                                    })
                                    .await;
                                    match rendered {
                                        Ok(rendered) => pages.set(rendered),
                                        Err(e) => status.set(Some(error_text(&e))),
                                    }
                                    busy.set(false);
                                });
                            }
                        },
                    }
                    ActionButton { label: "Choose Another", secondary: true, onclick: move |_| reset() }
                }

                if !pages.read().is_empty() {
                    div { style: "display: flex; justify-content: space-between; align-items: center; margin-top: 24px;",
                        h3 { "{pages.read().len()} page(s) rendered" }
                        ActionButton { label: "Save All", onclick: save_all }
                    }
                    div { style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px;",
                        for page in pages() {
                            PageCard { key: "{page.page_number}", page }
                        }
                    }
                }
            } else {
                PickArea {
                    label: "Choose a PDF",
                    hint: "Every page becomes one image",
                    accept: Accept::Pdf,
                    onpick: move |picked: Vec<PickedFile>| {
                        let Some(file) = picked.into_iter().next() else {
                            return;
                        };
                        match PdfReader::from_bytes(&file.bytes) {
                            Ok(reader) => {
                                let count = reader.page_count();
                                tracing::info!(file = %file.name, pages = count, "PDF chosen");
                                source.set(Some((file, count)));
                                pages.set(Vec::new());
                                status.set(None);
                            }
                            Err(e) => status.set(Some(error_text(&e))),
                        }
                    },
                    onerror: move |e: KhotiyanError| status.set(Some(error_text(&e))),
                }
            }

            StatusLine { message: status() }
        }
    }
}

#[component]
fn PageCard(page: RenderedPage) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut saved = use_signal(|| Option::<String>::None);
    let name = page.file_name();
    let bytes = page.bytes.clone();
    let src = use_memo(use_reactive((&page.bytes,), |(bytes,)| files::data_url(&bytes)));

    rsx! {
        div {
            Preview {
                src: src(),
                caption: format!("Page {} \u{00B7} {}x{}", page.page_number, page.width, page.height),
                byte_len: page.bytes.len() as u64,
            }
            div { style: "margin-top: 8px; text-align: center;",
                ActionButton {
                    label: "Save",
                    secondary: true,
                    onclick: move |_| match svc.save_output(ToolKind::PdfToImage, &name, &bytes) {
                        Ok(Some(record)) => {
                            saved.set(Some(format!("Saved {}", record.file_name)));
                            state.write().record(record);
                        }
                        Ok(None) => {}
                        Err(e) => saved.set(Some(error_text(&e))),
                    },
                }
            }
            StatusLine { message: saved() }
        }
    }
}
