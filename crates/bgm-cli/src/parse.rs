use crate::cmd::ParseArgs;
use crate::config::Config;
use crate::utils::{parallel_future, read_source};
use anyhow::Context;
use bgm_bbcode_parser::{parse_with_options, ParseOptions};
use tracing::debug;

pub async fn run_parse_command(args: ParseArgs) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref()).await?;
    let options = if args.raw {
        ParseOptions {
            normalize: false,
            smilies: false,
        }
    } else {
        config.parse
    };

    let mut trees = parallel_future(
        args.files.into_iter().enumerate(),
        args.jobs,
        |(idx, file)| {
            let options = options.clone();
            async move {
                let content = read_source(&file).await?;
                let tree = tokio::task::spawn_blocking(move || parse_with_options(content, &options))
                    .await
                    .with_context(|| format!("when parsing file {file}"))?;
                debug!("parsed file {file}");
                Ok((idx, file, tree))
            }
        },
    )
    .await?;
    trees.sort_by_key(|(idx, ..)| *idx);

    let multiple = trees.len() > 1;
    for (_, file, tree) in trees {
        if multiple {
            println!("==> {file} <==");
        }
        if args.json {
            let output = serde_json::to_string_pretty(&tree)
                .with_context(|| format!("when serializing tree of {file}"))?;
            println!("{output}");
        } else {
            println!("{tree:#?}");
        }
    }
    Ok(())
}
