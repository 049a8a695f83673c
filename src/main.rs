use clap::Parser;

fn main() -> anyhow::Result<()> {
    deskpet_lib::run(deskpet_lib::Cli::parse())
}
