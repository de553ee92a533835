#![cfg(target_arch = "wasm32")]

use murmur_wasm::FlockCanvas;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_canvas(id: &str) {
    let document = web_sys::window()
        .expect("no global window")
        .document()
        .expect("no document");
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    canvas.set_id(id);
    document.body().unwrap().append_child(&canvas).unwrap();
}

#[wasm_bindgen_test]
fn construct_and_run_frames() {
    mount_canvas("flock-under-test");

    let mut flock =
        FlockCanvas::new("flock-under-test", 800.0, 500.0, 30).expect("construction failed");
    assert_eq!(flock.agent_count(), 30);

    for _ in 0..5 {
        flock.frame().expect("frame failed");
    }
}

#[wasm_bindgen_test]
fn click_spawn_and_debug_toggle() {
    mount_canvas("flock-spawn-test");

    let mut flock =
        FlockCanvas::new("flock-spawn-test", 400.0, 300.0, 0).expect("construction failed");
    assert_eq!(flock.agent_count(), 0);

    flock.spawn_at(200.0, 150.0);
    flock.spawn_at(210.0, 150.0);
    assert_eq!(flock.agent_count(), 2);

    flock.toggle_debug();
    flock.frame().expect("debug frame failed");
}

#[wasm_bindgen_test]
fn missing_canvas_is_an_error() {
    assert!(FlockCanvas::new("does-not-exist", 100.0, 100.0, 1).is_err());
}
