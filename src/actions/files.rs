use crate::{
    actions::{is_interactive, print_listing, required, Context},
    commands::params::{
        flag_value, PARAMETER_CACHE, PARAMETER_DST, PARAMETER_FLATTEN, PARAMETER_NO_CACHE,
        PARAMETER_NO_FLATTEN, PARAMETER_NO_RECURSE, PARAMETER_RECURSE, PARAMETER_REPOSITORY_PATH,
        PARAMETER_SRC,
    },
    error::CliError,
    error_utils,
    transfer::{self, RepositoryPath, TransferOptions, TransferReport},
};
use clap::ArgMatches;
use std::path::Path;
use tracing::{debug, trace};

fn transfer_options(sub_matches: &ArgMatches) -> TransferOptions {
    let defaults = TransferOptions::default();
    TransferOptions {
        flatten: flag_value(
            sub_matches,
            PARAMETER_FLATTEN,
            PARAMETER_NO_FLATTEN,
            defaults.flatten,
        ),
        recurse: flag_value(
            sub_matches,
            PARAMETER_RECURSE,
            PARAMETER_NO_RECURSE,
            defaults.recurse,
        ),
        cache: flag_value(sub_matches, PARAMETER_CACHE, PARAMETER_NO_CACHE, defaults.cache),
        progress: is_interactive(),
    }
}

/// Print the outcome of a transfer and fail when any file failed.
fn conclude(report: TransferReport, verb: &str) -> Result<(), CliError> {
    if report.skipped.is_empty() {
        eprintln!("{} {} file(s)", verb, report.transferred.len());
    } else {
        eprintln!(
            "{} {} file(s), {} already up to date",
            verb,
            report.transferred.len(),
            report.skipped.len()
        );
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::PartialTransfer {
            failed: report.failures.len(),
            total: report.total(),
        })
    }
}

pub fn list_files(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing list command...");
    let path = RepositoryPath::parse(required::<String>(sub_matches, PARAMETER_REPOSITORY_PATH)?)?;

    let client = context.client()?;
    let assets = client.assets().list_prefix(&path.repository, &path.path)?;
    print_listing(&assets, sub_matches)
}

pub fn delete_files(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing delete command...");
    let path = RepositoryPath::parse(required::<String>(sub_matches, PARAMETER_REPOSITORY_PATH)?)?;

    let client = context.client()?;
    let assets = client.assets().list_prefix(&path.repository, &path.path)?;
    debug!("Deleting {} asset(s) under {}", assets.len(), path);

    let mut deleted = 0;
    let mut failed = 0;
    for asset in &assets {
        match client.assets().delete(&asset.id) {
            Ok(()) => deleted += 1,
            Err(e) => {
                error_utils::report_warning(&format!("{}: {}", asset.repository_path(), e));
                failed += 1;
            }
        }
    }

    eprintln!("Deleted {} file(s)", deleted);
    if failed > 0 {
        return Err(CliError::PartialTransfer {
            failed,
            total: assets.len(),
        });
    }
    Ok(())
}

pub fn upload(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing upload command...");
    let source = required::<String>(sub_matches, PARAMETER_SRC)?;
    let destination = required::<String>(sub_matches, PARAMETER_DST)?;
    let options = transfer_options(sub_matches);

    let client = context.client()?;
    let report = transfer::upload(&client, Path::new(source), destination, &options)?;
    conclude(report, "Uploaded")
}

pub fn download(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing download command...");
    let source = required::<String>(sub_matches, PARAMETER_SRC)?;
    let destination = required::<String>(sub_matches, PARAMETER_DST)?;
    let options = transfer_options(sub_matches);

    let client = context.client()?;
    let report = transfer::download(&client, source, destination, &options)?;
    conclude(report, "Downloaded")
}
