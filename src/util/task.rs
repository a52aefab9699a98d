use futures::FutureExt;
use std::panic::AssertUnwindSafe;

/// Runs `future`, turning a panic into `Err` with the panic message.
///
/// Spawned tasks use this so the UI hears about a crashed fetch instead of
/// waiting for a result that never comes.
pub async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future).catch_unwind().await.map_err(|panic| {
        if let Some(s) = panic.downcast_ref::<&'static str>() {
            s.to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_through_value() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_captures_panic_message() {
        let result = catch_task_panic(async {
            panic!("boom {}", 1);
        })
        .await;
        assert_eq!(result, Err::<(), _>("boom 1".to_string()));
    }
}
