//! Input parameter validation tests.
//!
//! For any tool invocation with invalid parameters, the handler must reject
//! the call before any external process is spawned.

#[cfg(test)]
mod tests {
    use crate::server_startup::test_config;
    use proptest::prelude::*;
    use video_edit_mcp::{
        SpeedUpVideoParams, TrimVideoParams, VideoEditHandler,
    };
    use video_edit_mcp_common::error::Error;

    /// Missing required fields fail deserialization.
    #[test]
    fn test_missing_fields_rejected_at_deserialization() {
        let result: Result<TrimVideoParams, _> =
            serde_json::from_str(r#"{"video_path": "in.mp4"}"#);
        assert!(result.is_err(), "Missing times and output_name should fail");

        let result: Result<SpeedUpVideoParams, _> = serde_json::from_str(r#"{}"#);
        assert!(result.is_err(), "Empty object should fail");
    }

    /// Wrongly typed fields fail deserialization.
    #[test]
    fn test_wrong_types_rejected_at_deserialization() {
        let result: Result<TrimVideoParams, _> = serde_json::from_str(
            r#"{
            "video_path": "in.mp4",
            "start_time": "zero",
            "end_time": 2.0,
            "output_name": "out.mp4"
        }"#,
        );
        assert!(result.is_err(), "String start_time should fail");
    }

    /// An inverted time window is a validation error, not a subprocess error.
    #[tokio::test]
    async fn test_trim_inverted_window_is_validation_error() {
        let handler = VideoEditHandler::new(test_config()).await.expect("handler");

        let err = handler
            .trim_video(TrimVideoParams {
                video_path: "in.mp4".to_string(),
                start_time: 5.0,
                end_time: 1.0,
                output_name: "out.mp4".to_string(),
                return_path: true,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    }

    proptest! {
        /// Any non-positive speed is rejected as a validation error.
        #[test]
        fn nonpositive_speed_rejected(speed in -100.0f64..=0.0f64) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let handler = VideoEditHandler::new(test_config()).await.unwrap();
                let result = handler
                    .speed_up_video(SpeedUpVideoParams {
                        video_path: "in.mp4".to_string(),
                        speed,
                        output_name: "out.mp4".to_string(),
                        return_path: true,
                    })
                    .await;
                prop_assert!(matches!(result, Err(Error::Validation(_))));
                Ok(())
            })?;
        }

        /// Any inverted or degenerate trim window is rejected.
        #[test]
        fn degenerate_trim_window_rejected(start in 0.0f64..100.0f64, delta in 0.0f64..10.0f64) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let handler = VideoEditHandler::new(test_config()).await.unwrap();
                let result = handler
                    .trim_video(TrimVideoParams {
                        video_path: "in.mp4".to_string(),
                        start_time: start + delta,
                        end_time: start,
                        output_name: "out.mp4".to_string(),
                        return_path: true,
                    })
                    .await;
                prop_assert!(matches!(result, Err(Error::Validation(_))));
                Ok(())
            })?;
        }
    }
}
