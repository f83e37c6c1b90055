//! Default command: build executables or libraries

use anyhow::Result;

use crate::cli::Cli;
use skiff::ops::{build, plan, BuildMode, BuildOptions};
use skiff::util::{GlobalContext, Shell};

pub fn execute(cli: Cli, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?.with_global_config();

    let opts = BuildOptions {
        mode: if cli.lib {
            BuildMode::Libraries
        } else {
            BuildMode::Executables
        },
        targets: cli.targets,
        build_all: cli.all,
        include_tests: cli.tests,
        single_main: cli.single_main,
        include_hidden: cli.include_hidden,
        output: cli.output,
        include_paths: cli.include_paths,
        arch: cli.arch,
    };

    if cli.plan {
        let plan = plan(&ctx, &opts, shell)?;
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    build(&ctx, &opts, shell)?;
    Ok(())
}
