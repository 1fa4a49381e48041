// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).help("Row id")
}

fn req(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn rm_cmd() -> Command {
    Command::new("rm").about("Delete a row by id").arg(id_arg())
}

fn list_cmd(searchable: bool) -> Command {
    let cmd = Command::new("list").about("List rows with totals");
    let cmd = if searchable {
        cmd.arg(opt("search", "Case-insensitive description filter"))
    } else {
        cmd
    };
    json_flags(cmd)
}

pub fn build_cli() -> Command {
    Command::new("moneydash")
        .version(crate_version!())
        .about("Personal finance dashboard: income, expenses, credits, services, reserve fund and gifts")
        .arg(
            Arg::new("config")
                .long("config")
                .env("MONEYDASH_CONFIG")
                .global(true)
                .help("Path to config.toml"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .help("Reference date for month windows (YYYY-MM-DD); defaults to today"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v, -vv)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
        .subcommand(Command::new("init").about("Create the local database and a default config"))
        .subcommand(
            Command::new("income")
                .about("Income entries")
                .subcommand(
                    Command::new("add")
                        .arg(req("amount", "Amount"))
                        .arg(req("date", "Date (YYYY-MM-DD)"))
                        .arg(req("description", "Description"))
                        .arg(opt("notes", "Notes")),
                )
                .subcommand(list_cmd(true))
                .subcommand(rm_cmd())
                .subcommand(json_flags(
                    Command::new("chart")
                        .about("Income per month over the recent window")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize))
                                .help("Number of months (default from config)"),
                        ),
                )),
        )
        .subcommand(
            Command::new("expense")
                .about("Expense entries")
                .subcommand(
                    Command::new("add")
                        .arg(req("amount", "Amount"))
                        .arg(req("date", "Date (YYYY-MM-DD)"))
                        .arg(req("description", "Description"))
                        .arg(opt("kind", "fijo | variable").default_value("variable"))
                        .arg(opt("status", "pendiente | pagado").default_value("pendiente")),
                )
                .subcommand(list_cmd(true))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("reserve")
                .about("Reserve fund movements")
                .subcommand(
                    Command::new("add")
                        .arg(req("amount", "Amount"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("deposito")
                                .help("deposito | retiro"),
                        )
                        .arg(req("date", "Date (YYYY-MM-DD)"))
                        .arg(opt("concept", "Concept")),
                )
                .subcommand(list_cmd(false))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("credit")
                .about("Credits and loans")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Name"))
                        .arg(req("total", "Total balance"))
                        .arg(opt("paid", "Amount already paid").default_value("0"))
                        .arg(opt("rate", "Annual interest rate, percent").default_value("0"))
                        .arg(opt("due", "Due date (YYYY-MM-DD)")),
                )
                .subcommand(list_cmd(false))
                .subcommand(
                    Command::new("pay")
                        .about("Record a payment against a credit")
                        .arg(id_arg())
                        .arg(req("amount", "Payment amount")),
                )
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("service")
                .about("Recurring services and subscriptions")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Name"))
                        .arg(req("amount", "Charge per period"))
                        .arg(
                            Arg::new("periodicity")
                                .long("periodicity")
                                .default_value("mensual")
                                .help("semanal | mensual | anual"),
                        )
                        .arg(opt("billing-date", "Next billing date (YYYY-MM-DD)")),
                )
                .subcommand(list_cmd(false))
                .subcommand(
                    Command::new("toggle")
                        .about("Switch a service between active and paused")
                        .arg(id_arg()),
                )
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("budget")
                .about("Budget categories")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Category name"))
                        .arg(req("budgeted", "Budgeted amount"))
                        .arg(opt("spent", "Spent so far").default_value("0")),
                )
                .subcommand(list_cmd(false))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("gift")
                .about("Gift wishlist")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Gift"))
                        .arg(opt("price", "Estimated price"))
                        .arg(opt("description", "Description"))
                        .arg(opt("recipient", "Who it is for")),
                )
                .subcommand(list_cmd(false))
                .subcommand(
                    Command::new("toggle")
                        .about("Mark a gift as purchased or not")
                        .arg(id_arg()),
                )
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("wallet")
                .about("Wallet accounts")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Account name"))
                        .arg(req("kind", "efectivo | debito | ahorro ..."))
                        .arg(req("balance", "Current balance"))
                        .arg(opt("currency", "Currency code").default_value("MXN")),
                )
                .subcommand(list_cmd(false))
                .subcommand(rm_cmd()),
        )
        .subcommand(json_flags(
            Command::new("balance").about("Overall balance: totals, reserve, debt and services"),
        ))
        .subcommand(
            Command::new("dashboard")
                .about("Headline figures and monthly snapshots")
                .subcommand(json_flags(Command::new("show").about("KPIs and recent months")))
                .subcommand(
                    Command::new("snapshot")
                        .about("Store the totals of a month as a snapshot")
                        .arg(req("month", "Month (YYYY-MM)")),
                ),
        )
        .subcommand(
            Command::new("export").about("Export tables").subcommand(
                Command::new("table")
                    .arg(Arg::new("table").required(true).help("Table name, e.g. income"))
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv | json"),
                    )
                    .arg(req("out", "Output file")),
            ),
        )
}
