//! Shell completion generation for mysqlsh
//!
//! Scripts come from clap_complete, extended so `-D/--schema` completes
//! schema names from the configured catalog.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result};

const BIN_NAME: &str = "mysqlsh";

/// Print the completion script for `shell_name` to stdout
pub fn generate_completion(shell_name: &str) -> Result<()> {
    let script = render_completion(shell_name)?;
    print!("{}", script);
    Ok(())
}

/// Build the completion script for `shell_name`
pub fn render_completion(shell_name: &str) -> Result<String> {
    let shell = parse_shell(shell_name)?;

    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    let basic_completion = String::from_utf8_lossy(&buffer);

    let schema_completion = match shell {
        Shell::Bash => BASH_SCHEMAS,
        Shell::Zsh => ZSH_SCHEMAS,
        _ => FISH_SCHEMAS,
    };

    Ok(format!("{}\n{}", basic_completion, schema_completion))
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(ConfigError::Generic(format!(
            "Unsupported shell: {}. Supported shells: bash, zsh, fish",
            shell_name
        ))
        .into()),
    }
}

const BASH_SCHEMAS: &str = r#"# Schema names from the configured catalog
_mysqlsh_list_schemas() {
    mysqlsh config --list-schemas 2>/dev/null
}

_mysqlsh_enhanced() {
    local cur prev words cword
    _init_completion || return

    if [[ "$prev" == "-D" || "$prev" == "--schema" ]]; then
        COMPREPLY=($(compgen -W "$(_mysqlsh_list_schemas)" -- "$cur"))
        return 0
    fi

    _mysqlsh "$@"
}

complete -F _mysqlsh_enhanced mysqlsh
"#;

const ZSH_SCHEMAS: &str = r#"# Schema names from the configured catalog
_mysqlsh_schemas() {
    local -a schemas
    schemas=($(mysqlsh config --list-schemas 2>/dev/null))
    _describe 'schemas' schemas
}

_mysqlsh_enhanced() {
    if [[ ${words[CURRENT-1]} == "-D" || ${words[CURRENT-1]} == "--schema" ]]; then
        _mysqlsh_schemas
        return 0
    fi

    _mysqlsh "$@"
}

compdef _mysqlsh_enhanced mysqlsh
"#;

const FISH_SCHEMAS: &str = r#"# Schema names from the configured catalog
complete -c mysqlsh -s D -l schema -f -a "(mysqlsh config --list-schemas 2>/dev/null)" -d "Default schema"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell() {
        assert!(matches!(parse_shell("bash"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("fish"), Ok(Shell::Fish)));
        assert!(parse_shell("invalid").is_err());
    }

    #[test]
    fn test_parse_shell_case_insensitive() {
        assert!(matches!(parse_shell("BASH"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("FiSh"), Ok(Shell::Fish)));
    }

    #[test]
    fn test_bash_script_completes_schemas() {
        let script = render_completion("bash").unwrap();
        assert!(script.contains("complete"));
        assert!(script.contains("--list-schemas"));
        assert!(script.contains("--schema"));
    }

    #[test]
    fn test_fish_script() {
        let script = render_completion("fish").unwrap();
        assert!(script.contains("complete -c mysqlsh -s D -l schema"));
    }
}
