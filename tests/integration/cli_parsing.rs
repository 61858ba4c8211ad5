use clap::{CommandFactory, Parser};
use playground::tooling::cli::{Cli, Commands, ProjectCommands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["playground", "serve"],
        vec!["playground", "serve", "--host", "0.0.0.0", "--port", "5000"],
        vec!["playground", "project", "list"],
        vec!["playground", "project", "list", "--user", "u1", "--format", "json"],
        vec!["playground", "project", "show", "p1"],
        vec!["playground", "project", "delete", "p1", "--yes"],
        vec!["playground", "config", "show"],
        vec!["playground", "--workspace", "/tmp", "--log-level", "debug", "config", "show"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_missing_project_id() {
    assert!(Cli::try_parse_from(["playground", "project", "show"]).is_err());
    assert!(Cli::try_parse_from(["playground", "project", "delete", "--yes"]).is_err());
    assert!(Cli::try_parse_from(["playground", "serve", "--port", "not-a-port"]).is_err());
}

#[test]
fn delete_flags_are_parsed() {
    let cli = Cli::try_parse_from(["playground", "project", "delete", "p1", "--user", "u2"]).unwrap();
    match cli.command {
        Commands::Project {
            command: ProjectCommands::Delete { id, user, yes },
        } => {
            assert_eq!(id, "p1");
            assert_eq!(user.as_deref(), Some("u2"));
            assert!(!yes);
        }
        _ => panic!("expected project delete"),
    }
}

#[test]
fn top_level_help_lists_commands() {
    let mut command = Cli::command();
    let mut output = Vec::new();
    command.write_long_help(&mut output).unwrap();
    let output = String::from_utf8(output).unwrap();
    for token in ["serve", "project", "config", "--workspace", "--log-level"] {
        assert!(output.contains(token), "help is missing {token}");
    }
}
