use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["stockwatch"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_check_command() {
    let cli = Cli::try_parse_from(["stockwatch", "check"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Check { dry_run: false })
    ));
}

#[test]
fn parses_check_dry_run() {
    let cli = Cli::try_parse_from(["stockwatch", "check", "--dry-run"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Check { dry_run: true })));
}

#[test]
fn parses_fingerprint_command() {
    let cli =
        Cli::try_parse_from(["stockwatch", "fingerprint"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Fingerprint)));
}

#[test]
fn dry_run_is_not_accepted_on_fingerprint() {
    assert!(Cli::try_parse_from(["stockwatch", "fingerprint", "--dry-run"]).is_err());
}
