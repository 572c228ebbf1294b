use anyhow::{Context, Result};
use futures::StreamExt;
use std::future::Future;
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Path meaning stdin.
pub const STDIN_PATH: &str = "-";

/// Read bbcode source from file at `path`, or from stdin if `path` is [STDIN_PATH].
///
/// # Errors
///
/// When failed to read or the content is not valid utf-8.
pub async fn read_source(path: &str) -> Result<String> {
    if path == STDIN_PATH {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("when reading content from stdin")?;
        return Ok(content);
    }

    fs::read_to_string(path)
        .await
        .with_context(|| format!("when reading content file {path}"))
}

/// Generate a series of tasks from [task_source] by running [`closure`], run those tasks and
/// return.
///
/// Results are NOT in the same order of `task_source`.
///
/// # Errors
///
/// Return error when any of the generated tasks failed.
#[allow(clippy::future_not_send)]
pub async fn parallel_future<T, U, W, V>(
    task_source: T,
    buffer_size: usize,
    closure: U,
) -> Result<Vec<V>>
where
    T: Iterator,
    U: FnMut(<T as Iterator>::Item) -> W,
    W: Future<Output = Result<V>> + Sized,
{
    let ret = futures::stream::iter(task_source.map(closure))
        .buffer_unordered(buffer_size.max(1))
        .collect::<Vec<Result<V>>>()
        .await
        .into_iter()
        .collect::<Result<Vec<V>>>()?;
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::io::Write;

    #[tokio::test]
    async fn test_parallel_future() {
        let mut result = parallel_future(0..10, 3, |x| async move { Ok(x * 2) })
            .await
            .expect("all tasks succeed");
        result.sort();
        assert_eq!(result, (0..10).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_parallel_future_fails() {
        let result = parallel_future(0..4, 0, |x| async move {
            if x == 2 {
                Err(anyhow!("task {x} failed"))
            } else {
                Ok(x)
            }
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_source() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        write!(file, "[b]hi[/b]").expect("write temp file");
        let path = file.path().to_string_lossy().to_string();
        assert_eq!(read_source(&path).await.expect("read file"), "[b]hi[/b]");
        assert!(read_source("/definitely/not/here.bbcode").await.is_err());
    }
}
