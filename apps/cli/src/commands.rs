//! Subcommand execution

use std::io::Write;

use anyhow::{Context, anyhow};
use tether_convert::{ConverterRegistry, ValueType};
use tracing::debug;

use crate::cli::Command;

const ABSENT: &str = "absent";

/// Run `command` against `registry`, writing results to `out`.
pub fn execute(
    registry: &ConverterRegistry,
    command: &Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Decode { type_name, text } => {
            let target = lookup(registry, type_name)?;
            match registry.as_object(Some(text.as_str()), &target)? {
                Some(value) => writeln!(out, "{value:?}")?,
                None => writeln!(out, "{ABSENT}")?,
            }
        }
        Command::Encode { type_name, text } => {
            let target = lookup(registry, type_name)?;
            let value = registry.as_object(Some(text.as_str()), &target)?;
            match registry.as_string(value.as_ref())? {
                Some(canonical) => writeln!(out, "{canonical}")?,
                None => writeln!(out, "{ABSENT}")?,
            }
        }
        Command::Types => {
            for name in registry.catalog().names() {
                writeln!(out, "{name}")?;
            }
        }
    }
    out.flush().context("failed to write output")
}

fn lookup(registry: &ConverterRegistry, name: &str) -> anyhow::Result<ValueType> {
    let ty = registry
        .catalog()
        .lookup(name)
        .ok_or_else(|| anyhow!("unknown type '{name}' (see `tether types`)"))?;
    debug!(type_name = name, "resolved target type");
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_convert::EnumType;

    fn run(registry: &ConverterRegistry, command: Command) -> anyhow::Result<String> {
        let mut out = Vec::new();
        execute(registry, &command, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn decode(type_name: &str, text: &str) -> Command {
        Command::Decode {
            type_name: type_name.to_string(),
            text: text.to_string(),
        }
    }

    fn encode(type_name: &str, text: &str) -> Command {
        Command::Encode {
            type_name: type_name.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_decode_prints_debug_form() {
        let registry = ConverterRegistry::with_builtins();
        assert_eq!(run(&registry, decode("i32", "0x1F")).unwrap(), "I32(31)\n");
        assert_eq!(run(&registry, decode("bool", "YES")).unwrap(), "Bool(true)\n");
    }

    #[test]
    fn test_negative_numbers_and_years() {
        let registry = ConverterRegistry::with_builtins();
        assert_eq!(run(&registry, decode("i32", "-5")).unwrap(), "I32(-5)\n");
        assert_eq!(
            run(&registry, encode("datetime", "-0043-03-15T00:00:00Z")).unwrap(),
            "-0043-03-15T00:00:00Z\n"
        );
    }

    #[test]
    fn test_empty_text_is_absent() {
        let registry = ConverterRegistry::with_builtins();
        assert_eq!(run(&registry, decode("char", "")).unwrap(), "absent\n");
        assert_eq!(run(&registry, encode("locale", "")).unwrap(), "absent\n");
    }

    #[test]
    fn test_encode_normalizes() {
        let registry = ConverterRegistry::with_builtins();
        assert_eq!(
            run(&registry, encode("datetime", "2024-01-15 10:30:00")).unwrap(),
            "2024-01-15T10:30:00Z\n"
        );
        assert_eq!(run(&registry, encode("charset", "latin1")).unwrap(), "ISO-8859-1\n");
    }

    #[test]
    fn test_declared_enums_are_addressable_by_name() {
        let registry = ConverterRegistry::with_builtins();
        registry.declare(&EnumType::dynamic("shop.Color", ["Red", "Green"], false).into());
        assert_eq!(run(&registry, encode("shop.Color", "Green")).unwrap(), "Green\n");
        assert!(run(&registry, encode("shop.Color", "Blue")).is_err());
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let registry = ConverterRegistry::with_builtins();
        let err = run(&registry, decode("geo.Point", "1,2")).unwrap_err();
        assert!(err.to_string().contains("unknown type 'geo.Point'"));
    }

    #[test]
    fn test_types_lists_builtins() {
        let registry = ConverterRegistry::with_builtins();
        let listing = run(&registry, Command::Types).unwrap();
        let names: Vec<&str> = listing.lines().collect();
        assert!(names.contains(&"datetime"));
        assert!(names.contains(&"i64"));
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
