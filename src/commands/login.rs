//! Login command definition.

use crate::commands::params::{
    flag_pair, COMMAND_LOGIN, PARAMETER_NO_X509_VERIFY, PARAMETER_PASSWORD, PARAMETER_URL,
    PARAMETER_USERNAME, PARAMETER_X509_VERIFY,
};
use clap::{Arg, Command};

pub fn login_command() -> Command {
    Command::new(COMMAND_LOGIN)
        .about("Login to Nexus server, saving settings to the configuration file")
        .arg(
            Arg::new(PARAMETER_URL)
                .short('U')
                .long(PARAMETER_URL)
                .num_args(1)
                .help("Nexus OSS URL (e.g., http://localhost:8081)"),
        )
        .arg(
            Arg::new(PARAMETER_USERNAME)
                .short('u')
                .long(PARAMETER_USERNAME)
                .num_args(1)
                .help("Nexus user"),
        )
        .arg(
            Arg::new(PARAMETER_PASSWORD)
                .short('p')
                .long(PARAMETER_PASSWORD)
                .num_args(1)
                .help("Password for the Nexus user"),
        )
        .args(flag_pair(
            PARAMETER_X509_VERIFY,
            PARAMETER_NO_X509_VERIFY,
            "Verify server certificate [default: verify]",
        ))
}
