use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "armory", bin_name = "armory", version, disable_help_subcommand = true)]
#[command(about = "Attach items to gear and keep the wearer's effects in sync", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// World data directory (defaults to $ARMORY_DATA, then the OS data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<String>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Attach an item to a carrier
    Attach {
        /// Carrier reference (armor or weapon)
        carrier: String,
        /// Item to attach
        item: String,
    },

    /// Detach an item from a carrier and remove its effects
    #[command(alias = "rm")]
    Detach {
        /// Carrier reference
        carrier: String,
        /// Item to detach
        item: String,
    },

    /// Equip a carrier, applying the effects of its attachments
    Equip {
        /// Carrier reference
        carrier: String,
    },

    /// Unequip a carrier, removing the effects of its attachments
    Unequip {
        /// Carrier reference
        carrier: String,
    },

    /// List a carrier's attachments
    #[command(alias = "ls")]
    List {
        /// Carrier reference
        carrier: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an actor's effects
    Effects {
        /// Actor reference
        actor: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a carrier's derived effects and repair inconsistencies
    Doctor {
        /// Carrier reference
        carrier: String,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_attach_with_global_options() {
        let cli = Cli::try_parse_from([
            "armory", "attach", "armor#1", "ring#9", "--data", "/tmp/w", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data.as_deref(), Some("/tmp/w"));
        match cli.command {
            Commands::Attach { carrier, item } => {
                assert_eq!(carrier, "armor#1");
                assert_eq!(item, "ring#9");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_aliases() {
        let cli = Cli::try_parse_from(["armory", "ls", "armor#1", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::List { json: true, .. }));

        let cli = Cli::try_parse_from(["armory", "rm", "armor#1", "ring#9"]).unwrap();
        assert!(matches!(cli.command, Commands::Detach { .. }));
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["armory"]).is_err());
    }
}
