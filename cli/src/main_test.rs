use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("filotra").chain(args.iter().copied())).unwrap()
}

#[test]
fn base_url_defaults_to_local_backend() {
    let cli = parse(&["whoami"]);
    assert_eq!(cli.base_url, "http://localhost:3000");
    assert_eq!(cli.verbose, 0);
}

#[test]
fn verbose_flag_counts() {
    let cli = parse(&["-vv", "whoami"]);
    assert_eq!(cli.verbose, 2);
}

#[test]
fn transaction_decisions_take_an_id() {
    let cli = parse(&["transactions", "approve", "tx-1"]);
    assert!(matches!(
        cli.command,
        Command::Transactions(TransactionsCommand { command: TransactionsSubcommand::Approve { ref id } }) if id == "tx-1"
    ));
}

#[test]
fn group_create_defaults_to_internal_type() {
    let cli = parse(&["groups", "create", "--name", "Keuangan"]);
    let Command::Groups(GroupsCommand { command: GroupsSubcommand::Create { name, description, kind } }) = cli.command else {
        panic!("expected groups create");
    };
    assert_eq!(name, "Keuangan");
    assert_eq!(description, "");
    assert_eq!(kind, "Internal");
}

#[test]
fn audit_logs_action_is_optional() {
    let cli = parse(&["audit-logs", "--action", "login"]);
    assert!(matches!(cli.command, Command::AuditLogs { action: Some(ref a) } if a == "login"));
}

#[test]
fn password_requires_all_three_fields() {
    let result = Cli::try_parse_from(["filotra", "password", "--current", "a", "--new", "b"]);
    assert!(result.is_err());
}
