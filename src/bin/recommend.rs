/**
 * NeighborReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

#[macro_use]
extern crate log;

use std::env;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::process;

use getopts::{Matches, Options};

use neighborreco::io;
use neighborreco::{InteractionMatrix, LabelResolver, Labels, RecommenderConfig, ScoredItem};

fn main() {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "interactions", "Input file name (required). The input is a user-item \
        matrix of interaction counts, with one user per line and tab separated counts per item.",
        "PATH");
    opts.optopt("a", "item-labels", "File with item names (optional). One header line, then \
        one name per line in column order.", "PATH");
    opts.optopt("u", "user-labels", "File with user names (optional). One header line, then \
        one name per line in row order.", "PATH");
    opts.optopt("k", "nearest-users", "Number of most similar users to consider (optional, \
        defaults to 3).", "NUMBER");
    opts.optopt("n", "num-items", "Number of items to recommend per user (optional, defaults \
        to 10).", "NUMBER");
    opts.optopt("t", "threads", "Number of threads to use (optional, defaults to the number of \
        CPUs).", "NUMBER");
    opts.optopt("", "user", "Only compute recommendations for the user in this row \
        (optional).", "INDEX");
    opts.optopt("o", "outputfile", "Output file name (optional, output will be written to \
        stdout by default).", "PATH");
    opts.optflag("s", "scale", "Scale the counts of every user by their maximum count first, \
        which bounds all scores to [0, 1].");
    opts.optflag("j", "json", "Write one JSON object per user instead of a readable report.");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    let interactions_path = match matches.opt_str("i") {
        Some(path) => path,
        None => return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an input file via --interactions."),
        ),
    };

    let defaults = RecommenderConfig::default();

    let nearest_users: usize = match matches.opt_get_default("k", defaults.nearest_users) {
        Ok(k) => k,
        Err(failure) => {
            let hint = format!("Problem with option 'k': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let max_items: usize = match matches.opt_get_default("n", defaults.max_items) {
        Ok(n) => n,
        Err(failure) => {
            let hint = format!("Problem with option 'n': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let threads: usize = match matches.opt_get_default("t", num_cpus::get()) {
        Ok(threads) => threads,
        Err(failure) => {
            let hint = format!("Problem with option 't': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let single_user: Option<usize> = match matches.opt_get("user") {
        Ok(user) => user,
        Err(failure) => {
            let hint = format!("Problem with option 'user': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let config = match RecommenderConfig::new(nearest_users, max_items) {
        Ok(config) => config,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if let Err(failure) = compute_recommendations(
        &interactions_path, &matches, &config, threads, single_user) {

        error!("{}", failure);
        process::exit(1);
    }
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));

    process::exit(if hint.is_some() { 2 } else { 0 });
}

fn read_labels_or_number(path: Option<String>, n: usize) -> neighborreco::Result<Labels> {
    match path {
        Some(path) => {
            info!("Reading labels from {}", path);
            io::read_labels(&path)
        },
        None => Ok(Labels::numbered(n)),
    }
}

fn compute_recommendations(
    interactions_path: &str,
    matches: &Matches,
    config: &RecommenderConfig,
    threads: usize,
    single_user: Option<usize>,
) -> neighborreco::Result<()> {

    info!("Reading interaction counts from {}", interactions_path);
    let mut matrix: InteractionMatrix = io::read_matrix(interactions_path)?;

    info!("Found {} users and {} items.", matrix.num_users(), matrix.num_items());

    let item_labels = read_labels_or_number(matches.opt_str("a"), matrix.num_items())?;
    let user_labels = read_labels_or_number(matches.opt_str("u"), matrix.num_users())?;
    io::check_labels(&matrix, &item_labels, &user_labels)?;

    if matches.opt_present("s") {
        info!("Scaling interaction counts per user");
        matrix = matrix.scaled_per_user();
    }

    let recommendations: Vec<(usize, Vec<ScoredItem>)> = match single_user {
        Some(user) => {
            info!("Computing recommendations for user {}", user_labels.resolve_or_index(user));
            vec![(user, neighborreco::recommend(&matrix, user, config)?)]
        },
        None => {
            info!("Computing {} recommendations per user from {} nearest users",
                config.max_items, config.nearest_users);
            neighborreco::recommend_all(&matrix, config, threads)?
                .into_iter()
                .enumerate()
                .collect()
        },
    };

    let out: Box<dyn Write> = match matches.opt_str("o") {
        Some(path) => {
            info!("Writing recommendations to {}", path);
            Box::new(File::create(&Path::new(&path))?)
        },
        _ => Box::new(stdout())
    };
    let mut out = BufWriter::new(out);

    for (user, recommended_items) in recommendations.iter() {
        if matches.opt_present("j") {
            io::write_recommendations_json(
                &mut out, *user, recommended_items, &item_labels, &user_labels)?;
        } else {
            io::write_report(
                &mut out, &matrix, *user, recommended_items, &item_labels, &user_labels)?;
        }
    }

    out.flush()?;

    Ok(())
}
