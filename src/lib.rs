#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod model;
pub mod parse;
pub mod scene;

use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

use model::value_set::{SwitchKind, ValueSetError};
use model::{Iid, Iteration};
use parse::comet_json::{self, ParseError};
use scene::mesh::Mesh;
use scene::orientation::{self, AngleUnit};
use scene::settings::{SceneSettings, SettingsError};
use scene::{SceneObject, ValueError, collect_scene_objects, values};

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // niets te doen zonder panic hook
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // niets te doen zonder debug logs
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("kon rayon threadpool niet initialiseren: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Fouten van de engine, los van hun JS-representatie.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("er is geen iteratie geladen")]
    NoIteration,
    #[error("ongeldige iid `{0}`")]
    InvalidIid(String),
    #[error("onbekende value set {0}")]
    UnknownValueSet(Iid),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    ValueSet(#[from] ValueSetError),
}

#[derive(Debug, Serialize)]
struct SceneObjectExport<'a> {
    #[serde(flatten)]
    object: &'a SceneObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    mesh: Option<Mesh>,
}

/// Publiek toegangspunt voor JS.
#[wasm_bindgen]
pub struct SceneEngine {
    settings: SceneSettings,
    iteration: Option<Iteration>,
}

#[wasm_bindgen]
impl SceneEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SceneEngine {
        SceneEngine {
            settings: SceneSettings::default(),
            iteration: None,
        }
    }

    /// Vervang de scene-instellingen; ontbrekende velden krijgen hun standaardwaarde.
    #[wasm_bindgen]
    pub fn load_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings: SceneSettings = serde_wasm_bindgen::from_value(settings)
            .map_err(|err| js_error(&format!("ongeldige instellingen: {err}")))?;
        self.apply_settings(settings).map_err(to_js_error)
    }

    /// Laad een COMET JSON-document.
    #[wasm_bindgen]
    pub fn load_iteration(&mut self, json: &str) -> Result<(), JsValue> {
        self.load_iteration_json(json).map_err(to_js_error)
    }

    /// Opties van de geladen iteratie.
    #[wasm_bindgen]
    pub fn options(&self) -> Result<JsValue, JsValue> {
        let iteration = self.iteration().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(iteration.options())
            .map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Scene objects met hun mesh in wereldcoördinaten.
    #[wasm_bindgen]
    pub fn scene_objects(
        &self,
        option: Option<String>,
        states: Vec<String>,
    ) -> Result<JsValue, JsValue> {
        let option = option.as_deref().map(parse_iid).transpose().map_err(to_js_error)?;
        let states = states
            .iter()
            .map(|state| parse_iid(state))
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_js_error)?;

        let objects = self.scene(option, &states).map_err(to_js_error)?;
        let exports: Vec<SceneObjectExport<'_>> = objects
            .iter()
            .map(|object| SceneObjectExport {
                object,
                mesh: object.world_mesh(self.settings.mesh_segments),
            })
            .collect();

        serde_wasm_bindgen::to_value(&exports).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Hoeken `[x, y, z]` van een rij-georiënteerde 3×3 matrix.
    #[wasm_bindgen]
    pub fn matrix_to_euler(matrix: &[f64], degrees: bool) -> Result<Vec<f64>, JsValue> {
        orientation::matrix_to_euler(matrix, angle_unit(degrees))
            .map(Vec::from)
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn euler_to_matrix(x: f64, y: f64, z: f64, degrees: bool) -> Vec<f64> {
        orientation::euler_to_matrix(x, y, z, angle_unit(degrees)).to_vec()
    }

    /// RGB (0-255) van een kleurtekst; onbekende kleuren worden wit.
    #[wasm_bindgen]
    pub fn parse_color(text: &str) -> Vec<f64> {
        values::parse_color(text).to_vec()
    }

    /// Schrijf één waarde in de actieve reeks van een value set.
    #[wasm_bindgen]
    pub fn set_value(&mut self, value_set: &str, index: usize, value: &str) -> Result<(), JsValue> {
        let iid = parse_iid(value_set).map_err(to_js_error)?;
        self.update_value(iid, index, value).map_err(to_js_error)
    }

    /// Zet de value switch (`MANUAL`, `COMPUTED` of `REFERENCE`).
    #[wasm_bindgen]
    pub fn set_switch(&mut self, value_set: &str, switch: &str) -> Result<(), JsValue> {
        let iid = parse_iid(value_set).map_err(to_js_error)?;
        let switch: SwitchKind = switch.parse().map_err(to_js_error)?;
        self.update_switch(iid, switch).map_err(to_js_error)
    }
}

impl Default for SceneEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneEngine {
    pub fn apply_settings(&mut self, settings: SceneSettings) -> Result<(), EngineError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn load_iteration_json(&mut self, json: &str) -> Result<(), EngineError> {
        let iteration = comet_json::parse_str(json)?;
        debug_log!(
            "iteratie geladen: {} usages",
            iteration.usages().len()
        );
        self.iteration = Some(iteration);
        Ok(())
    }

    pub fn iteration(&self) -> Result<&Iteration, EngineError> {
        self.iteration.as_ref().ok_or(EngineError::NoIteration)
    }

    #[must_use]
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Scene objects voor `option` en `states` met de huidige instellingen.
    pub fn scene(&self, option: Option<Iid>, states: &[Iid]) -> Result<Vec<SceneObject>, EngineError> {
        let iteration = self.iteration()?;
        Ok(collect_scene_objects(iteration, option, states, &self.settings))
    }

    pub fn update_value(&mut self, value_set: Iid, index: usize, value: &str) -> Result<(), EngineError> {
        self.value_set_mut(value_set)?.update(index, value)?;
        Ok(())
    }

    pub fn update_switch(&mut self, value_set: Iid, switch: SwitchKind) -> Result<(), EngineError> {
        self.value_set_mut(value_set)?.set_switch(switch);
        Ok(())
    }

    fn value_set_mut(
        &mut self,
        iid: Iid,
    ) -> Result<&mut model::value_set::ParameterValueSet, EngineError> {
        self.iteration
            .as_mut()
            .ok_or(EngineError::NoIteration)?
            .value_set_mut(iid)
            .ok_or(EngineError::UnknownValueSet(iid))
    }
}

fn angle_unit(degrees: bool) -> AngleUnit {
    if degrees {
        AngleUnit::Degrees
    } else {
        AngleUnit::Radians
    }
}

fn parse_iid(text: &str) -> Result<Iid, EngineError> {
    Iid::parse_str(text.trim()).map_err(|_| EngineError::InvalidIid(text.to_owned()))
}

fn to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
