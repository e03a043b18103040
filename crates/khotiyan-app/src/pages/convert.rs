// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Convert page — re-encode an image as PNG, JPEG, WEBP, BMP, GIF or TIFF.

use dioxus::prelude::*;
use khotiyan_core::error::KhotiyanError;
use khotiyan_core::naming::converted_name;
use khotiyan_core::{OutputFormat, ToolKind};
use khotiyan_document::{Converted, convert_image};

use crate::components::{
    ActionButton, PickArea, Preview, StatusLine, ToolHeader, error_text, parse_quality,
};
use crate::services::app_services::{AppServices, run_blocking};
use crate::services::files::{self, Accept, PickedFile};
use crate::state::AppState;

#[component]
pub fn Convert() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let mut source = use_signal(|| Option::<PickedFile>::None);
    let mut format = use_signal(|| state.peek().config.default_convert_format);
    let mut quality = use_signal(|| state.peek().config.default_quality);
    let mut result = use_signal(|| Option::<Converted>::None);
    let mut busy = use_signal(|| false);
    let mut status = use_signal(|| Option::<String>::None);
    let result_url = use_memo(move || {
        result
            .read()
            .as_ref()
            .map(|converted| files::data_url(&converted.bytes))
    });

    let mut reset = move || {
        source.set(None);
        result.set(None);
        status.set(None);
    };

    let convert_label = if busy() { "Converting..." } else { "Convert" };

    rsx! {
        div {
            ToolHeader { tool: ToolKind::Convert }

            if let Some(file) = source() {
                Preview {
                    src: file.preview.clone(),
                    caption: file.name.clone(),
                    byte_len: file.byte_len(),
                }

                div { style: "display: flex; gap: 16px; align-items: center; flex-wrap: wrap; margin: 16px 0;",
                    label { "Convert to "
                        select {
                            style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                            value: "{format().extension()}",
                            onchange: move |evt| {
                                if let Some(f) = OutputFormat::from_extension(&evt.value()) {
                                    format.set(f);
                                    result.set(None);
                                }
                            },
                            for f in OutputFormat::ALL {
                                option { value: "{f.extension()}", "{f.label()}" }
                            }
                        }
                    }
                    if format().uses_quality() {
                        label { "Quality {quality().to_percent()}% "
                            input {
                                r#type: "range",
                                min: "0.1",
                                max: "1",
                                step: "0.1",
                                value: "{quality().value()}",
                                oninput: move |evt| {
                                    if let Some(q) = parse_quality(&evt.value()) {
                                        quality.set(q);
                                    }
                                },
                            }
                        }
                    }
                }

                div { style: "display: flex; gap: 8px;",
                    ActionButton {
                        label: convert_label,
                        disabled: busy(),
                        onclick: {
                            let source_bytes = file.bytes.clone();
                            move |_| {
                                let bytes = source_bytes.clone();
                                let (target, q) = (format(), quality());
                                busy.set(true);
                                status.set(None);
                                spawn(async move {
                                    match run_blocking(move || convert_image(&bytes, target, q)).await {
                                        Ok(converted) => {
                                            tracing::info!(format = target.label(), "conversion done");
                                            result.set(Some(converted));
                                        }
                                        Err(e) => status.set(Some(error_text(&e))),
                                    }
                                    busy.set(false);
                                });
                            }
                        },
                    }
                    ActionButton { label: "Choose Another", secondary: true, onclick: move |_| reset() }
                }

                if let Some(converted) = result() {
                    div { style: "margin-top: 24px;",
                        h3 { "Converted to {converted.format.label()}" }
                        Preview {
                            src: result_url().unwrap_or_default(),
                            caption: converted_name(converted.format),
                            byte_len: converted.bytes.len() as u64,
                            checkered: converted.format.keeps_alpha(),
                        }
                        div { style: "margin-top: 12px;",
                            ActionButton {
                                label: "Save",
                                onclick: {
                                    let svc = svc.clone();
                                    let converted = converted.clone();
                                    move |_| {
                                        let name = converted_name(converted.format);
                                        match svc.save_output(ToolKind::Convert, &name, &converted.bytes) {
                                            Ok(Some(record)) => {
                                                status.set(Some(format!("Saved {}", record.file_name)));
                                                state.write().record(record);
                                            }
                                            Ok(None) => {}
                                            Err(e) => status.set(Some(error_text(&e))),
                                        }
                                    }
                                },
                            }
                        }
                    }
                }
            } else {
                PickArea {
                    label: "Choose an image",
                    hint: "PNG, JPEG, WEBP, BMP, GIF or TIFF",
                    accept: Accept::Image,
                    onpick: move |picked: Vec<PickedFile>| {
                        if let Some(file) = picked.into_iter().next() {
                            tracing::info!(file = %file.name, bytes = file.bytes.len(), "image chosen for conversion");
                            source.set(Some(file));
                            result.set(None);
                            status.set(None);
                        }
                    },
                    onerror: move |e: KhotiyanError| status.set(Some(error_text(&e))),
                }
            }

            StatusLine { message: status() }
        }
    }
}
