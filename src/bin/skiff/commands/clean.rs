//! `skiff --clean` command

use anyhow::Result;

use skiff::ops::clean;
use skiff::util::{GlobalContext, Shell};

pub fn execute(shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?.with_global_config();
    clean(&ctx, shell)
}
