use clap::Parser;
use hypercone_playground::config::Args;

fn main() {
    let args = Args::parse();
    hypercone_playground::run(args.viewer_config());
}
