// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Photo Resize page — set a new width/height, optionally crop first.

use dioxus::prelude::*;
use khotiyan_core::crop::{Gesture, Point};
use khotiyan_core::error::KhotiyanError;
use khotiyan_core::naming::resized_name;
use khotiyan_core::{CropEditor, Dimensions, ToolKind};
use khotiyan_document::{ResizeRequest, inspect_image, resize_image};

use crate::components::{ActionButton, PickArea, Preview, StatusLine, ToolHeader, error_text};
use crate::services::app_services::{AppServices, run_blocking};
use crate::services::files::{self, Accept, PickedFile};
use crate::state::AppState;

/// Widest the crop preview is drawn, in CSS pixels.
const CROP_PREVIEW_WIDTH: f32 = 480.0;

/// Aspect presets offered while cropping.
const ASPECTS: [(&str, Option<f32>); 5] = [
    ("Free", None),
    ("1:1", Some(1.0)),
    ("4:3", Some(4.0 / 3.0)),
    ("3:2", Some(3.0 / 2.0)),
    ("16:9", Some(16.0 / 9.0)),
];

fn aspect_button_style(selected: bool) -> &'static str {
    if selected {
        "padding: 4px 10px; border-radius: 6px; border: 1px solid #007aff; background: #007aff; color: white;"
    } else {
        "padding: 4px 10px; border-radius: 6px; border: 1px solid #ccc; background: white;"
    }
}

fn parse_side(text: &str) -> Option<u32> {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|v| (1..=Dimensions::MAX_SIDE).contains(v))
}

#[component]
pub fn Resize() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let mut source = use_signal(|| Option::<(PickedFile, Dimensions)>::None);
    let mut dims = use_signal(Dimensions::default);
    let mut lock_aspect = use_signal(|| true);
    let mut editor = use_signal(|| Option::<CropEditor>::None);
    let mut aspect_label = use_signal(|| "Free");
    let mut result = use_signal(|| Option::<(Vec<u8>, Dimensions)>::None);
    let mut busy = use_signal(|| false);
    let mut status = use_signal(|| Option::<String>::None);
    let result_url = use_memo(move || result.read().as_ref().map(|(png, _)| files::data_url(png)));

    // Aspect lock follows the crop when one is active.
    let reference = move || -> Dimensions {
        match (editor.read().as_ref(), source.read().as_ref()) {
            (Some(ed), _) => ed.rect().dimensions(),
            (None, Some((_, original))) => *original,
            (None, None) => Dimensions::default(),
        }
    };

    let resize_label = if busy() { "Resizing..." } else { "Resize" };

    rsx! {
        div {
            ToolHeader { tool: ToolKind::Resize }

            if let Some((file, original)) = source() {
                if let Some(ed) = editor() {
                    {
                        let (dw, dh) = ed.display_size();
                        let overlay = ed.overlay();
                        let handles = ed.handles();
                        let rect = ed.rect();
                        rsx! {
                            div { style: "display: flex; gap: 8px; align-items: center; margin-bottom: 8px;",
                                span { "Aspect" }
                                for (label, ratio) in ASPECTS {
                                    button {
                                        style: "{aspect_button_style(aspect_label() == label)}",
                                        onclick: move |_| {
                                            if let Some(ed) = editor.write().as_mut() {
                                                match ed.set_aspect(ratio) {
                                                    Ok(()) => aspect_label.set(label),
                                                    Err(e) => status.set(Some(error_text(&e))),
                                                }
                                            }
                                            if let Some(ed) = editor.read().as_ref() {
                                                dims.set(ed.rect().dimensions());
                                            }
                                        },
                                        "{label}"
                                    }
                                }
                            }
                            div {
                                style: "position: relative; width: {dw}px; height: {dh}px; cursor: crosshair; user-select: none; margin: 0 auto;",
                                onmousedown: move |evt| {
                                    let p = evt.element_coordinates();
                                    if let Some(ed) = editor.write().as_mut() {
                                        ed.pointer_down(Point::new(p.x as f32, p.y as f32));
                                    }
                                },
                                onmousemove: move |evt| {
                                    let p = evt.element_coordinates();
                                    let point = Point::new(p.x as f32, p.y as f32);
                                    let active = editor
                                        .read()
                                        .as_ref()
                                        .is_some_and(|ed| ed.gesture() != Gesture::Idle);
                                    if active && let Some(ed) = editor.write().as_mut() {
                                        ed.pointer_move(point);
                                    }
                                },
                                onmouseup: move |_| {
                                    let rect = editor.write().as_mut().map(|ed| ed.pointer_up());
                                    if let Some(rect) = rect {
                                        dims.set(rect.dimensions());
                                        result.set(None);
                                    }
                                },
                                onmouseleave: move |_| {
                                    if let Some(ed) = editor.write().as_mut() {
                                        ed.cancel();
                                    }
                                },
                                img {
                                    src: "{file.preview}",
                                    draggable: "false",
                                    style: "width: {dw}px; height: {dh}px; display: block; pointer-events: none;",
                                }
                                for shade in overlay {
                                    div { style: "position: absolute; left: {shade.left}px; top: {shade.top}px; width: {shade.width}px; height: {shade.height}px; background: rgba(0,0,0,0.45); pointer-events: none;" }
                                }
                                for (_, centre) in handles {
                                    div { style: "position: absolute; left: {centre.x - 5.0}px; top: {centre.y - 5.0}px; width: 10px; height: 10px; background: white; border: 1px solid #007aff; pointer-events: none;" }
                                }
                            }
                            p { style: "color: #666; font-size: 13px; text-align: center;",
                                "Crop {rect.width} \u{00D7} {rect.height} at ({rect.x}, {rect.y}). Drag to draw, drag inside to move, drag a corner to resize."
                            }
                        }
                    }
                } else {
                    Preview {
                        src: file.preview.clone(),
                        caption: format!("{} \u{00B7} {original}", file.name),
                        byte_len: file.byte_len(),
                    }
                }

                div { style: "display: flex; gap: 16px; align-items: center; flex-wrap: wrap; margin: 16px 0;",
                    label { "Width "
                        input {
                            r#type: "number",
                            min: "1",
                            style: "width: 90px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                            value: "{dims().width}",
                            oninput: move |evt| {
                                if let Some(w) = parse_side(&evt.value()) {
                                    dims.set(dims().with_width(w, reference(), lock_aspect()));
                                    result.set(None);
                                }
                            },
                        }
                    }
                    label { "Height "
                        input {
                            r#type: "number",
                            min: "1",
                            style: "width: 90px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                            value: "{dims().height}",
                            oninput: move |evt| {
                                if let Some(h) = parse_side(&evt.value()) {
                                    dims.set(dims().with_height(h, reference(), lock_aspect()));
                                    result.set(None);
                                }
                            },
                        }
                    }
                    label {
                        input {
                            r#type: "checkbox",
                            checked: lock_aspect(),
                            onchange: move |evt| lock_aspect.set(evt.checked()),
                        }
                        " Lock aspect ratio"
                    }
                    label {
                        input {
                            r#type: "checkbox",
                            checked: editor.read().is_some(),
                            onchange: move |evt| {
                                if evt.checked() {
                                    let mut ed = CropEditor::new(original.width, original.height);
                                    if let Err(e) = ed.fit_display_width(CROP_PREVIEW_WIDTH) {
                                        status.set(Some(error_text(&e)));
                                        return;
                                    }
                                    editor.set(Some(ed));
                                } else {
                                    editor.set(None);
                                    dims.set(original);
                                }
                                aspect_label.set("Free");
                                result.set(None);
                            },
                        }
                        " Crop first"
                    }
                }

                div { style: "display: flex; gap: 8px;",
                    ActionButton {
                        label: resize_label,
                        disabled: busy(),
                        onclick: {
                            let source_bytes = file.bytes.clone();
                            move |_| {
                                let bytes = source_bytes.clone();
                                let target = dims();
                                let mut request = ResizeRequest::new(target);
                                if let Some(ed) = editor.read().as_ref() {
                                    request = request.with_crop(ed.rect());
                                }
                                busy.set(true);
                                status.set(None);
                                spawn(async move {
                                    match run_blocking(move || resize_image(&bytes, request)).await {
                                        Ok(png) => result.set(Some((png, target))),
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
                            editor.set(None);
                            result.set(None);
                            status.set(None);
                        },
                    }
                }

                if let Some((png, size)) = result() {
                    {
                        let name = resized_name(size);
                        rsx! {
                            div { style: "margin-top: 24px;",
                                h3 { "Resized to {size}" }
                                Preview {
                                    src: result_url().unwrap_or_default(),
                                    caption: name.clone(),
                                    byte_len: png.len() as u64,
                                    checkered: true,
                                }
                                div { style: "margin-top: 12px;",
                                    ActionButton {
                                        label: "Save",
                                        onclick: {
                                            let svc = svc.clone();
                                            let png = png.clone();
                                            let name = name.clone();
                                            move |_| match svc.save_output(ToolKind::Resize, &name, &png) {
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
                    label: "Choose a photo",
                    hint: "The result is saved as PNG",
                    accept: Accept::Image,
                    onpick: move |picked: Vec<PickedFile>| {
                        let Some(file) = picked.into_iter().next() else {
                            return;
                        };
                        match inspect_image(&file.bytes) {
                            Ok(info) => {
                                let original = info.dimensions();
                                tracing::info!(file = %file.name, %original, "photo chosen for resize");
                                dims.set(original);
                                source.set(Some((file, original)));
                                editor.set(None);
                                result.set(None);
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
