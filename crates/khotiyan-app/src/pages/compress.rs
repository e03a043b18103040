// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compress page — shrink an image under a size budget picked on a slider.

use dioxus::prelude::*;
use khotiyan_core::error::KhotiyanError;
use khotiyan_core::naming::format_kb;
use khotiyan_core::ToolKind;
use khotiyan_document::{CompressionOutcome, CompressionSettings, compress};

use crate::components::{
    ActionButton, PickArea, Preview, StatusLine, ToolHeader, error_text, parse_quality,
};
use crate::services::app_services::{AppServices, run_blocking};
use crate::services::files::{self, Accept, PickedFile};
use crate::state::AppState;

#[component]
pub fn Compress() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let mut source = use_signal(|| Option::<PickedFile>::None);
    let mut max_mb = use_signal(|| state.peek().config.compress_max_size_mb);
    let mut quality = use_signal(|| state.peek().config.compress_initial_quality);
    let mut result = use_signal(|| Option::<CompressionOutcome>::None);
    let mut busy = use_signal(|| false);
    let mut status = use_signal(|| Option::<String>::None);
    let result_url = use_memo(move || {
        result
            .read()
            .as_ref()
            .map(|outcome| files::data_url(&outcome.bytes))
    });

    let compress_label = if busy() { "Compressing..." } else { "Compress" };

    rsx! {
        div {
            ToolHeader { tool: ToolKind::Compress }

            if let Some(file) = source() {
                Preview {
                    src: file.preview.clone(),
                    caption: file.name.clone(),
                    byte_len: file.byte_len(),
                }

                div { style: "margin: 16px 0;",
                    label { "Maximum size: {max_mb():.1} MB "
                        input {
                            r#type: "range",
                            min: "0.1",
                            max: "5",
                            step: "0.1",
                            value: "{max_mb()}",
                            oninput: move |evt| {
                                if let Ok(mb) = evt.value().parse::<f32>() {
                                    max_mb.set(mb);
                                    result.set(None);
                                }
                            },
                        }
                    }
                    label { style: "margin-left: 16px;", "Compression quality {quality().value():.1} "
                        input {
                            r#type: "range",
                            min: "0.1",
                            max: "1",
                            step: "0.1",
                            value: "{quality().value()}",
                            oninput: move |evt| {
                                if let Some(q) = parse_quality(&evt.value()) {
                                    quality.set(q);
                                    result.set(None);
                                }
                            },
                        }
                    }
                }

                div { style: "display: flex; gap: 8px;",
                    ActionButton {
                        label: compress_label,
                        disabled: busy(),
                        onclick: {
                            let source_bytes = file.bytes.clone();
                            move |_| {
                                let bytes = source_bytes.clone();
                                let config = state.peek().config.clone();
                                let mb = max_mb();
                                let initial_quality = quality();
                                busy.set(true);
                                status.set(None);
                                spawn(async move {
                                    let outcome = run_blocking(move || {
                                        let settings = CompressionSettings {
                                            max_dimension: config.compress_max_dimension,
                                            initial_quality,
                                            ..CompressionSettings::from_megabytes(mb)?
                                        };
                                        compress(&bytes, &settings)
                                    })
                                    .await;
                                    match outcome {
                                        Ok(outcome) => result.set(Some(outcome)),
                                        Err(e) => status.set(Some(error_text(&e))),
                                    }
                                    busy.set(false);
                                });
                            }
                        },
                    }
                    ActionButton {
                        label: "Choose Another",
                        secondary: true,
                        onclick: move |_| {
                            source.set(None);
                            result.set(None);
                            status.set(None);
                        },
                    }
                }

                if let Some(outcome) = result() {
                    {
                        let name = outcome.file_name(&file.name);
                        let fits = outcome.bytes.len() as u64 <= (max_mb() * 1024.0 * 1024.0) as u64;
                        rsx! {
                            div { style: "margin-top: 24px;",
                                h3 { "Compressed" }
                                p { style: "color: #555;",
                                    "{format_kb(outcome.original_len)} \u{2192} {format_kb(outcome.bytes.len() as u64)} ({outcome.reduction_percent():.1}% smaller) \u{00B7} {outcome.dimensions()} \u{00B7} {outcome.format.label()}"
                                }
                                if !fits {
                                    p { style: "color: #c77700; font-size: 13px;",
                                        "Could not get under the limit; this is the smallest version found."
                                    }
                                }
                                Preview {
                                    src: result_url().unwrap_or_default(),
                                    caption: name.clone(),
                                    byte_len: outcome.bytes.len() as u64,
                                }
                                div { style: "margin-top: 12px;",
                                    ActionButton {
                                        label: "Save",
                                        onclick: {
                                            let svc = svc.clone();
                                            let bytes = outcome.bytes.clone();
                                            let name = name.clone();
                                            move |_| match svc.save_output(ToolKind::Compress, &name, &bytes) {
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
                    }
                }
            } else {
                PickArea {
                    label: "Choose an image",
                    hint: "PNG stays PNG; everything else is saved as JPEG",
                    accept: Accept::Image,
                    onpick: move |picked: Vec<PickedFile>| {
                        source.set(picked.into_iter().next());
                        result.set(None);
                        status.set(None);
                    },
                    onerror: move |e: KhotiyanError| status.set(Some(error_text(&e))),
                }
            }

            StatusLine { message: status() }
        }
    }
}
