//! Server-sent event frames for streamed generation output

use serde_json::json;

/// Sent once generation completed
pub const DONE_FRAME: &str = "event: done\ndata: \n\n";

/// One generated chunk
pub fn data_frame(chunk: &str) -> String {
    format!("data: {}\n\n", json!({ "d": chunk }))
}

/// Terminal failure, in place of [`DONE_FRAME`]
pub fn business_error_frame(code: &str, message: &str) -> String {
    format!(
        "event: business-error\ndata: {}\n\n",
        json!({ "code": code, "message": message })
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_frame_escapes_chunk() {
        assert_eq!(data_frame("<h1 class=\"x\">\n"), "data: {\"d\":\"<h1 class=\\\"x\\\">\\n\"}\n\n");
    }

    #[test]
    fn test_business_error_frame() {
        assert_eq!(
            business_error_frame("SITEGEN_LLM", "LLM error: timeout"),
            "event: business-error\ndata: {\"code\":\"SITEGEN_LLM\",\"message\":\"LLM error: timeout\"}\n\n"
        );
    }
}
