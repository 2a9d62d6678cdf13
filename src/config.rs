// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::Path;

use tracing::info;

mod error;
mod settings;

pub use self::error::ConfigError;
pub use self::settings::Settings;

/// Loads settings from the given file, or the defaults when there is none.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => {
            let settings = Settings::deserialize(path)?;
            info!(path = ?path, "Loaded settings");
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}
