//! Simulation configuration
//!
//! Loaded from a JSON file. Every field is checked and each failed check adds
//! one human-readable message; the engine only ever sees a fully validated
//! [`SimulationConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use glam::DVec2;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::consts::{MAX_BIAS_PERCENT, MAX_SIMULATIONS, MAX_STEPS};
use crate::sim::{
    BiasConfig, BiasDirection, Gate, Obstacle, RestartPolicy, SimulationParams, Terrain,
    WalkerType,
};

/// Keys a configuration file must contain, and the only ones it may contain
pub const CONFIG_KEYS: [&str; 10] = [
    "walker_type",
    "num_simulations",
    "num_steps",
    "save_results",
    "plot_statistics",
    "gates",
    "obstacles",
    "biased_walker_increasing",
    "biased_walker_direction",
    "restart_step",
];

const WALKER_TYPE_HELP: &str = "You must enter the type of the walker (walker_type), \
choose the number that corresponds to the description:\n\
1 - random walker\n\
2 - random walker in random length 0.5-1.5\n\
3 - regular random walker (up,down,left,right)\n\
4 - biased walker";

const OBSTACLE_HELP: &str = "Each obstacle has 2 points that will be recorded as follows in list:\n\
[x1,y1,x2,y2]\n\
more than one obstacle can be inserted.";

const GATE_HELP: &str = "Each gate contains at least 2 points and a goal point that will be \
recorded as follows in list:\n\
[x1,y1,x2,y2,[x3,y3]]\n\
You can enter more than one gate.";

const DIRECTION_HELP: &str = "biased_walker_direction must be one of these directions:\n\
up\ndown\nleft\nright\nbeginning of axis";

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File path is empty.")]
    EmptyPath,
    #[error("File path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Path does not point to a file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON format: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{}", .0.join("\n"))]
    Invalid(Vec<String>),
}

impl ConfigError {
    /// Messages to show the user, one per entry
    pub fn messages(&self) -> Vec<String> {
        match self {
            ConfigError::Invalid(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// A validated configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub params: SimulationParams,
    /// Write `results.txt` after the run
    pub save_results: bool,
    /// Hand the series to a plotting sink after the run
    pub plot_statistics: bool,
}

impl SimulationConfig {
    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Validate an already parsed JSON document
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let Some(map) = value.as_object() else {
            return Err(ConfigError::Invalid(vec![
                "The configuration must be a JSON object".to_string(),
            ]));
        };

        let mut unexpected: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|key| !CONFIG_KEYS.contains(key))
            .collect();
        if !unexpected.is_empty() {
            unexpected.sort_unstable();
            return Err(ConfigError::Invalid(vec![format!(
                "you entered unexpected keys: {}",
                unexpected.join(", ")
            )]));
        }

        let mut errors = Vec::new();
        let walker_code = walker_type(map, &mut errors);
        let num_simulations = bounded_count(map, "num_simulations", MAX_SIMULATIONS, &mut errors);
        let num_steps = bounded_count(map, "num_steps", MAX_STEPS, &mut errors);
        let save_results = yes_no(map, "save_results", "save the results", &mut errors);
        let plot_statistics = yes_no(map, "plot_statistics", "plot the statistics", &mut errors);
        let obstacles = obstacles(map, &mut errors);
        let gates = gates(map, &mut errors);
        let biased = walker_code == Some(4);
        let direction = bias_direction(map, biased, &mut errors);
        let increase = bias_increase(map, biased, &mut errors);
        let restart = restart_steps(map, &mut errors);

        if !errors.is_empty() {
            log::debug!("Configuration rejected with {} errors", errors.len());
            return Err(ConfigError::Invalid(errors));
        }

        // Every Option below is Some when no error was recorded
        let (
            Some(code),
            Some(num_simulations),
            Some(num_steps),
            Some(save_results),
            Some(plot_statistics),
            Some(obstacles),
            Some(gates),
            Some(restart),
        ) = (
            walker_code,
            num_simulations,
            num_steps,
            save_results,
            plot_statistics,
            obstacles,
            gates,
            restart,
        )
        else {
            return Err(ConfigError::Invalid(vec![
                "Configuration is incomplete".to_string(),
            ]));
        };

        let walker_type = match (code, direction.flatten(), increase.flatten()) {
            (1, _, _) => WalkerType::UnitRandomAngle,
            (2, _, _) => WalkerType::RandomAngleRandomLength,
            (3, _, _) => WalkerType::FourDirectionAxis,
            (_, Some(direction), Some(increase_percent)) => WalkerType::Biased(BiasConfig {
                direction,
                increase_percent,
            }),
            _ => {
                return Err(ConfigError::Invalid(vec![
                    "A biased walker needs biased_walker_direction and biased_walker_increasing"
                        .to_string(),
                ]));
            }
        };

        Ok(Self {
            params: SimulationParams {
                walker_type,
                num_simulations,
                num_steps,
                terrain: Terrain::new(obstacles, gates),
                restart,
            },
            save_results,
            plot_statistics,
        })
    }
}

/// `""` stands for "not configured" in list-valued fields
fn is_unset(value: &Value) -> bool {
    value.as_str() == Some("")
}

fn walker_type(map: &Map<String, Value>, errors: &mut Vec<String>) -> Option<u8> {
    match map.get("walker_type").and_then(Value::as_i64) {
        Some(code @ 1..=4) => Some(code as u8),
        _ => {
            errors.push(WALKER_TYPE_HELP.to_string());
            None
        }
    }
}

fn bounded_count(
    map: &Map<String, Value>,
    key: &str,
    max: u32,
    errors: &mut Vec<String>,
) -> Option<u32> {
    let Some(value) = map.get(key) else {
        errors.push(format!(
            "You must enter {key}, {key} must be a whole number between 1 and {max}"
        ));
        return None;
    };
    match value.as_i64() {
        Some(n) if n >= 1 && n <= i64::from(max) => Some(n as u32),
        _ => {
            errors.push(format!("{key} must be a whole number between 1 and {max}"));
            None
        }
    }
}

fn yes_no(
    map: &Map<String, Value>,
    key: &str,
    action: &str,
    errors: &mut Vec<String>,
) -> Option<bool> {
    match map.get(key) {
        None => {
            errors.push(format!(
                "You must enter {key}, write if you want or not to {action} - Yes / No"
            ));
            None
        }
        Some(value) => match value.as_str() {
            Some("Yes") => Some(true),
            Some("No") => Some(false),
            _ => {
                errors.push(format!("you must enter if you want to {action} - Yes / No"));
                None
            }
        },
    }
}

/// Integer coordinate as f64
fn coordinate(value: &Value) -> Option<f64> {
    value.as_i64().map(|v| v as f64)
}

fn obstacles(map: &Map<String, Value>, errors: &mut Vec<String>) -> Option<Vec<Obstacle>> {
    let Some(value) = map.get("obstacles") else {
        errors.push("if you don't want to enter obstacles, write in the value: \"\"".to_string());
        return None;
    };
    if is_unset(value) {
        return Some(Vec::new());
    }
    let Some(items) = value.as_array() else {
        errors.push(OBSTACLE_HELP.to_string());
        return None;
    };
    if !items.iter().all(Value::is_array) {
        errors.push("all the obstacles must be in list inside main list".to_string());
        return None;
    }

    let mut obstacles = Vec::with_capacity(items.len());
    for item in items.iter().filter_map(Value::as_array) {
        if item.len() != 4 {
            errors.push(OBSTACLE_HELP.to_string());
            return None;
        }
        let coords: Option<Vec<f64>> = item.iter().map(coordinate).collect();
        let Some(c) = coords else {
            errors.push("Each point in the obstacle consists only of whole numbers".to_string());
            return None;
        };
        obstacles.push(Obstacle::new(DVec2::new(c[0], c[1]), DVec2::new(c[2], c[3])));
    }
    Some(obstacles)
}

fn gates(map: &Map<String, Value>, errors: &mut Vec<String>) -> Option<Vec<Gate>> {
    let Some(value) = map.get("gates") else {
        errors.push("if you don't want to enter gates, write in the value: \"\"".to_string());
        return None;
    };
    if is_unset(value) {
        return Some(Vec::new());
    }
    let Some(items) = value.as_array() else {
        errors.push(GATE_HELP.to_string());
        return None;
    };
    if !items.iter().all(Value::is_array) {
        errors.push("all the gates must be in list inside main list".to_string());
        return None;
    }

    let mut gates = Vec::with_capacity(items.len());
    for item in items.iter().filter_map(Value::as_array) {
        if item.len() % 2 == 0 || item.len() < 5 {
            errors.push(GATE_HELP.to_string());
            return None;
        }
        let (goal, polyline) = item.split_last()?;
        let goal = goal
            .as_array()
            .filter(|g| g.len() == 2)
            .and_then(|g| Some(DVec2::new(g[0].as_f64()?, g[1].as_f64()?)));
        let Some(goal) = goal else {
            errors.push("The gate must end with one goal point [x,y]".to_string());
            return None;
        };
        let coords: Option<Vec<f64>> = polyline.iter().map(coordinate).collect();
        let Some(coords) = coords else {
            errors.push("Each point in the gate consists only of whole numbers".to_string());
            return None;
        };
        let vertices = coords
            .chunks_exact(2)
            .map(|xy| DVec2::new(xy[0], xy[1]))
            .collect();
        gates.push(Gate::new(vertices, goal));
    }
    Some(gates)
}

/// `Some(None)` when the walker is not biased and the field is unset
fn bias_direction(
    map: &Map<String, Value>,
    biased: bool,
    errors: &mut Vec<String>,
) -> Option<Option<BiasDirection>> {
    let Some(value) = map.get("biased_walker_direction") else {
        errors.push(if biased {
            "You chose biased walker, so you must choose which direction you want to \
             increase his chances"
                .to_string()
        } else {
            "No biased_walker_direction, if you chose another walker, enter in the value: \"\""
                .to_string()
        });
        return None;
    };
    if !biased && is_unset(value) {
        return Some(None);
    }
    match value.as_str().and_then(BiasDirection::from_str) {
        Some(direction) => Some(Some(direction)),
        None => {
            errors.push(DIRECTION_HELP.to_string());
            None
        }
    }
}

fn bias_increase(
    map: &Map<String, Value>,
    biased: bool,
    errors: &mut Vec<String>,
) -> Option<Option<u8>> {
    let Some(value) = map.get("biased_walker_increasing") else {
        errors.push(if biased {
            "You chose biased walker, so you must choose how many percentages you want to \
             increase his chances"
                .to_string()
        } else {
            "No biased_walker_increasing, if you chose another walker, enter in the value: \"\""
                .to_string()
        });
        return None;
    };
    if !biased && is_unset(value) {
        return Some(None);
    }
    match value.as_i64() {
        Some(pct) if (0..=i64::from(MAX_BIAS_PERCENT)).contains(&pct) => Some(Some(pct as u8)),
        _ => {
            errors.push(format!(
                "biased_walker_increasing must be a whole number between 0 and {MAX_BIAS_PERCENT}"
            ));
            None
        }
    }
}

fn restart_steps(map: &Map<String, Value>, errors: &mut Vec<String>) -> Option<RestartPolicy> {
    let Some(value) = map.get("restart_step") else {
        errors.push(
            "if you don't want to enter restart step, write in the value: \"\"".to_string(),
        );
        return None;
    };
    if is_unset(value) {
        return Some(RestartPolicy::default());
    }
    let numbers: Option<Vec<f64>> = value.as_array().and_then(|items| {
        items
            .iter()
            .map(|v| v.as_f64().filter(|&n| n > 0.0))
            .collect()
    });
    let Some(numbers) = numbers else {
        errors.push("restart_step must be a list of positive numbers".to_string());
        return None;
    };

    // A fractional entry can never equal a step index
    let steps = numbers
        .into_iter()
        .filter(|n| {
            let whole = n.fract() == 0.0 && *n <= f64::from(u32::MAX);
            if !whole {
                log::debug!("restart step {n} never matches a step, ignoring");
            }
            whole
        })
        .map(|n| n as u32)
        .collect();
    Some(RestartPolicy::new(steps))
}
