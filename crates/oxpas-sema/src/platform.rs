// platform.rs
//
// Target-dependent facts the type model depends on.

use serde::{Deserialize, Serialize};

use crate::errors::SemanticError;

const PRESETS: &[(&str, &str)] = &[
    ("win32", include_str!("../platforms/win32.toml")),
    ("win64", include_str!("../platforms/win64.toml")),
    ("linux64", include_str!("../platforms/linux64.toml")),
];

/// Target platform configuration.
///
/// All fields have defaults, so a TOML document only needs to name the
/// values that differ from 32-bit Windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Platform {
    /// Size of pointers, NativeInt and NativeUInt in bytes.
    pub pointer_size: u8,
    /// When true NativeInt/NativeUInt are weak aliases of the fixed-width
    /// integer of pointer size, and the native operator ladder is not used.
    pub native_int_weak_alias: bool,
    /// Size of Extended in bytes.
    pub extended_size: u8,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            pointer_size: 4,
            native_int_weak_alias: false,
            extended_size: 10,
        }
    }
}

impl Platform {
    /// Load one of the built-in presets (`win32`, `win64`, `linux64`).
    pub fn preset(name: &str) -> Result<Self, SemanticError> {
        let (_, source) = PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .ok_or_else(|| SemanticError::UnknownPlatform {
                name: name.to_string(),
                known: PRESETS.iter().map(|(preset, _)| *preset).collect::<Vec<_>>().join(", "),
            })?;
        Self::from_toml(source)
    }

    /// Parse a platform description from TOML.
    pub fn from_toml(source: &str) -> Result<Self, SemanticError> {
        let platform: Platform =
            toml::from_str(source).map_err(|e| SemanticError::PlatformConfig {
                message: e.to_string(),
            })?;
        if !matches!(platform.pointer_size, 4 | 8) {
            return Err(SemanticError::PlatformConfig {
                message: format!("pointer_size must be 4 or 8, got {}", platform.pointer_size),
            });
        }
        Ok(platform)
    }

    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_parse() {
        for name in Platform::preset_names() {
            assert!(Platform::preset(name).is_ok(), "preset {name} failed to parse");
        }
        let win64 = Platform::preset("Win64").unwrap();
        assert_eq!(win64.pointer_size, 8);
        assert_eq!(win64.extended_size, 8);
        assert!(!win64.native_int_weak_alias);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let platform = Platform::from_toml("native_int_weak_alias = true").unwrap();
        assert_eq!(platform.pointer_size, 4);
        assert!(platform.native_int_weak_alias);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = Platform::preset("amiga").unwrap_err();
        assert!(matches!(err, SemanticError::UnknownPlatform { .. }));
    }

    #[test]
    fn bad_pointer_size_is_rejected() {
        let err = Platform::from_toml("pointer_size = 2").unwrap_err();
        assert!(matches!(err, SemanticError::PlatformConfig { .. }));
    }
}
