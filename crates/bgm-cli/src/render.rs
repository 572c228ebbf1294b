use crate::cmd::RenderArgs;
use crate::config::Config;
use crate::utils::read_source;
use bgm_bbcode_parser::parse_with_options;
use bgm_bbcode_render::render_plain_text;

pub async fn run_render_command(args: RenderArgs) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref()).await?;
    let content = read_source(&args.file).await?;
    let tree = parse_with_options(content, &config.parse);
    println!("{}", render_plain_text(&tree, config.render));
    Ok(())
}
