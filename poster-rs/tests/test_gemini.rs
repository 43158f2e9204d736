use base64::Engine as _;
use poster_rs::{
    Compositor, CompositorConfig, FontConfig, GeminiConfig, GeminiImageGenerator,
    GenerationError, GenerationRequest, ImageGenerator, ImageOrigin, InteractionController, Vibe,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Serve a single HTTP response and hand back the raw request it answered.
async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });
    (format!("http://{addr}"), handle)
}

fn generator(endpoint: String) -> GeminiImageGenerator {
    let mut config = GeminiConfig::new("test-key");
    config.model = "test-model".to_string();
    config.endpoint = endpoint;
    GeminiImageGenerator::new(config).unwrap()
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(6, 9, image::Rgba([255, 222, 89, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn success_body(data: &[u8]) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{
                    "inlineData": {
                        "mimeType": "image/png",
                        "data": base64::engine::general_purpose::STANDARD.encode(data),
                    }
                }]
            }
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_generate_posts_prompt_and_decodes_image() {
    let png = png_bytes();
    let (endpoint, server) = serve_once("200 OK", success_body(&png)).await;

    let request = GenerationRequest::for_vibe(Vibe::Bold, None);
    let image = generator(endpoint).generate(&request).await.unwrap();
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.data, png);

    let raw_request = server.await.unwrap();
    assert!(raw_request.starts_with("POST /v1beta/models/test-model:generateContent HTTP/1.1"));
    assert!(raw_request.to_lowercase().contains("x-goog-api-key: test-key"));
    assert!(raw_request.contains("Brutalist design"));
    assert!(raw_request.contains("NO TEXT"));
}

#[tokio::test]
async fn test_generate_maps_http_errors() {
    let (endpoint, server) = serve_once(
        "500 Internal Server Error",
        r#"{"error":{"message":"boom"}}"#.to_string(),
    )
    .await;
    let request = GenerationRequest::for_vibe(Vibe::Truck, None);
    let err = generator(endpoint).generate(&request).await.unwrap_err();
    match err {
        GenerationError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_generate_without_image_is_missing_image() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"no"}]}}]}"#.to_string();
    let (endpoint, server) = serve_once("200 OK", body).await;
    let request = GenerationRequest::for_vibe(Vibe::Minimalist, None);
    assert!(matches!(
        generator(endpoint).generate(&request).await,
        Err(GenerationError::MissingImage)
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_controller_generates_through_gemini() {
    let (endpoint, server) = serve_once("200 OK", success_body(&png_bytes())).await;
    let compositor = Compositor::new(CompositorConfig {
        font_config: FontConfig {
            system_fonts: false,
            ..FontConfig::default()
        },
        ..CompositorConfig::default()
    });
    let mut ctl = InteractionController::new(compositor).unwrap();

    assert!(ctl.generate(&generator(endpoint)).await.unwrap());
    let background = ctl.state().background.as_ref().unwrap();
    assert_eq!(background.origin(), ImageOrigin::Generated);
    assert_eq!((background.width(), background.height()), (6, 9));
    server.await.unwrap();
}
