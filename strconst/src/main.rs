//
// Copyright (c) 2025-2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use clap::{CommandFactory, Parser};
use std::io::Write;
use strconst::error::{Error, GetExitCode};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = strconst::Args::parse();

    let mut stdout = std::io::stdout().lock();
    let result = strconst::run(&mut stdout, args);
    let _ = stdout.flush();

    match &result {
        Ok(()) => {}
        Err(error @ Error::ProjectRoot(_)) => strconst::Args::command()
            .error(clap::error::ErrorKind::InvalidValue, error)
            .exit(),
        Err(error) => eprintln!("strconst: {error}"),
    }

    std::process::exit(result.get_exit_code())
}
