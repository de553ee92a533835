use murmur_core::{AgentPool, SimConfig, Simulator, SteeringBehavior, SteeringLine, Vec2};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

const AGENT_SIZE: f64 = 5.0;

/// Canvas-backed driver for the flock. The page calls `frame()` once per
/// animation frame after pushing the current slider values through the
/// weight setters, so the simulation always runs on the live control state.
#[wasm_bindgen]
pub struct FlockCanvas {
    pool: AgentPool,
    simulator: Simulator,
    overlay: Vec<SteeringLine>,
    debug: bool,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

#[wasm_bindgen]
impl FlockCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        width: f64,
        height: f64,
        agent_count: usize,
    ) -> Result<FlockCanvas, JsValue> {
        console_log!("Initializing flock with {} agents", agent_count);

        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut pool = AgentPool::new();
        pool.spawn_uniform(agent_count, width as f32, height as f32);

        let simulator = Simulator::new(SimConfig {
            width: width as f32,
            height: height as f32,
            ..SimConfig::default()
        });

        Ok(FlockCanvas {
            pool,
            simulator,
            overlay: Vec::new(),
            debug: false,
            canvas,
            context,
        })
    }

    /// One tick plus a full redraw.
    pub fn frame(&mut self) -> Result<(), JsValue> {
        if self.debug {
            self.overlay.clear();
            let overlay = &mut self.overlay;
            self.simulator.tick_with_overlay(&mut self.pool, overlay);
        } else {
            self.simulator.tick(&mut self.pool);
        }
        self.render()
    }

    fn render(&self) -> Result<(), JsValue> {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;

        self.context.set_fill_style_str("rgb(130, 130, 130)");
        self.context.fill_rect(0.0, 0.0, width, height);

        let stats = self.simulator.stats();
        for agent in self.pool.iter() {
            let heading = (agent.velocity.y as f64).atan2(agent.velocity.x as f64);

            self.context.save();
            self.context
                .translate(agent.position.x as f64, agent.position.y as f64)?;
            self.context.rotate(heading)?;

            // Dart pointing along the heading.
            self.context.begin_path();
            self.context.move_to(-AGENT_SIZE, -AGENT_SIZE);
            self.context.line_to(AGENT_SIZE * 2.0, 0.0);
            self.context.line_to(-AGENT_SIZE, AGENT_SIZE);
            self.context.line_to(-AGENT_SIZE * 2.0, 0.0);
            self.context.close_path();

            // Brighter blue for agents in denser company.
            let blue = stats.intensity(agent.neighbor_count);
            self.context
                .set_fill_style_str(&format!("rgb(0, 0, {})", blue));
            self.context.fill();

            self.context.set_stroke_style_str("rgb(0, 0, 0)");
            self.context.set_line_width(1.0);
            self.context.stroke();

            self.context.restore();
        }

        if self.debug {
            self.draw_overlay()?;
        }

        Ok(())
    }

    fn draw_overlay(&self) -> Result<(), JsValue> {
        for line in &self.overlay {
            let color = match line.behavior {
                SteeringBehavior::Separation => "rgb(0, 0, 255)",
                SteeringBehavior::Cohesion => "rgb(0, 255, 0)",
                SteeringBehavior::Alignment => "rgb(255, 0, 0)",
            };
            self.context.set_stroke_style_str(color);
            self.context.begin_path();
            self.context.move_to(line.from.x as f64, line.from.y as f64);
            self.context.line_to(line.to.x as f64, line.to.y as f64);
            self.context.stroke();
        }
        Ok(())
    }

    /// Spawn one agent at a point with a random heading.
    pub fn spawn_at(&mut self, x: f64, y: f64) {
        let heading = js_sys::Math::random() * 360.0;
        self.pool.spawn(Vec2::new(x as f32, y as f32), heading as f32);
        console_log!(
            "Spawned agent at ({}, {}). Total agents: {}",
            x,
            y,
            self.pool.len()
        );
    }

    pub fn handle_mouse_click(&mut self, event: MouseEvent) {
        let canvas_element: &Element = self.canvas.as_ref();
        let rect = canvas_element.get_bounding_client_rect();
        let x = event.client_x() as f64 - rect.left();
        let y = event.client_y() as f64 - rect.top();
        self.spawn_at(x, y);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.simulator.config.width = width as f32;
        self.simulator.config.height = height as f32;
        console_log!("Resized to {}x{}", width, height);
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
        if !self.debug {
            self.overlay.clear();
        }
    }

    pub fn agent_count(&self) -> usize {
        self.pool.len()
    }

    pub fn set_separation_weight(&mut self, weight: f64) {
        self.simulator.config.separation_weight = weight as f32;
    }

    pub fn set_cohesion_weight(&mut self, weight: f64) {
        self.simulator.config.cohesion_weight = weight as f32;
    }

    pub fn set_alignment_weight(&mut self, weight: f64) {
        self.simulator.config.alignment_weight = weight as f32;
    }
}
