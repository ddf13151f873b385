// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("budgetclip")
        .about("Personal budget tracking with local mirror and remote sync")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the local mirror"))
        .subcommand(
            Command::new("auth")
                .about("Manage the active sync identity")
                .subcommand(
                    Command::new("sign-in")
                        .about("Activate the remote strategy for a user")
                        .arg(Arg::new("user").long("user").required(true))
                        .arg(Arg::new("server").long("server").required(true)),
                )
                .subcommand(Command::new("sign-out").about("Return to the local mirror"))
                .subcommand(Command::new("status").about("Show the active identity")),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit an existing transaction")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("search").long("search"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage budget ceilings")
                .subcommand(
                    Command::new("set")
                        .about("Create a budget ceiling")
                        .arg(Arg::new("scope").long("scope").required(true))
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("limit").long("limit").required(true)),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit a budget ceiling")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("limit").long("limit").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a budget")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(Command::new("clear").about("Delete every budget"))
                .subcommand(json_flags(Command::new("list").about("List budgets")))
                .subcommand(json_flags(
                    Command::new("report").about("Spend against every budget ceiling"),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .about("Register a custom category")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .about("List category options")
                        .arg(Arg::new("type").long("type")),
                ),
        )
        .subcommand(
            Command::new("currency")
                .about("Show or change the base currency")
                .subcommand(
                    Command::new("set")
                        .about("Set the base currency code")
                        .arg(Arg::new("code").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregate views over the transaction set")
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Income, expense, balance and savings rate")
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("search").long("search")),
                ))
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Income/expense per month")
                        .arg(Arg::new("month").long("month"))
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("spend-by-category")
                        .about("Expense totals per category")
                        .arg(Arg::new("month").long("month")),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export all transactions as CSV")
                        .arg(Arg::new("out").long("out")),
                ),
        )
        .subcommand(Command::new("undo").about("Undo the most recent action"))
        .subcommand(Command::new("redo").about("Redo the most recently undone action"))
        .subcommand(
            Command::new("alert")
                .about("Manage persistent budget alerts")
                .subcommand(Command::new("list").about("List active alert keys"))
                .subcommand(
                    Command::new("dismiss")
                        .about("Dismiss an active alert")
                        .arg(Arg::new("key").required(true)),
                ),
        )
        .subcommand(Command::new("sync").about("Pull the latest remote or mirror state"))
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}
