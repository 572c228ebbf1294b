use crate::cmd::FormatArgs;
use crate::utils::read_source;
use anyhow::Context;
use bgm_bbcode::bbcode_to_string;
use bgm_bbcode_parser::parse;
use tokio::fs;

/// Rewrite `content` with every tag closed and names in lowercase.
///
/// Line breaks are kept, stickers are kept as text.
fn format_source(content: &str) -> String {
    bbcode_to_string(&parse(content))
}

pub async fn run_format_command(args: FormatArgs) -> anyhow::Result<()> {
    let content = read_source(&args.file).await?;
    let formatted = format_source(&content);
    match args.output {
        Some(output) => fs::write(&output, formatted)
            .await
            .with_context(|| format!("when saving formatted content to {output}"))?,
        None => print!("{formatted}"),
    }
    Ok(())
}
