use std::sync::Mutex;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::json;

use posts_feed::dtos::post_dtos::NewPostUpload;
use posts_feed::models::{CapturedImage, CompleteDraft};
use posts_feed::repositories::{HttpPostRepository, PostsApi, RepoError};

#[derive(Clone, Copy)]
enum Mode {
    Healthy,
    Failing,
    Garbage,
}

#[derive(Default)]
struct Recorded {
    content_type: Mutex<Option<String>>,
    accept: Mutex<Option<String>>,
    body: Mutex<Vec<u8>>,
    posts: Mutex<usize>,
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn list_posts(mode: web::Data<Mode>) -> HttpResponse {
    match **mode {
        Mode::Healthy => HttpResponse::Ok().json(json!([
            { "nickname": "Alice", "message": "first", "image": { "url": "/uploads/1.jpg" } },
            { "nickname": "Bob", "message": "second", "image": { "url": "/uploads/2.jpg" } }
        ])),
        Mode::Failing => HttpResponse::InternalServerError().body("database down"),
        Mode::Garbage => HttpResponse::Ok().body("<html>maintenance</html>"),
    }
}

async fn create_post(
    req: HttpRequest,
    body: web::Bytes,
    mode: web::Data<Mode>,
    recorded: web::Data<Recorded>,
) -> HttpResponse {
    *recorded.content_type.lock().unwrap() = header(&req, "content-type");
    *recorded.accept.lock().unwrap() = header(&req, "accept");
    *recorded.body.lock().unwrap() = body.to_vec();
    *recorded.posts.lock().unwrap() += 1;

    match **mode {
        Mode::Failing => HttpResponse::ServiceUnavailable().body("try later"),
        _ => HttpResponse::Ok().json(json!({ "id": 3 })),
    }
}

async fn start_server(mode: Mode) -> (String, web::Data<Recorded>) {
    let recorded = web::Data::new(Recorded::default());
    let shared = recorded.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(shared.clone())
            .app_data(web::Data::new(mode))
            .route("/posts", web::get().to(list_posts))
            .route("/posts", web::post().to(create_post))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    (format!("http://{}", addr), recorded)
}

fn repo(base_url: &str) -> HttpPostRepository {
    HttpPostRepository::with_timeout(base_url, std::time::Duration::from_secs(5)).unwrap()
}

fn upload() -> NewPostUpload {
    let image = CapturedImage::from_bytes(&mime::IMAGE_JPEG, b"\xff\xd8jpeg-bytes");
    NewPostUpload::from_draft(CompleteDraft {
        nickname: "Alice",
        message: "hello world",
        image: &image,
    })
    .unwrap()
}

#[actix_web::test]
async fn fetches_posts_in_server_order() {
    let (base, _) = start_server(Mode::Healthy).await;

    let posts = repo(&base).fetch_posts().await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].nickname, "Alice");
    assert_eq!(posts[1].image.url, "/uploads/2.jpg");
}

#[actix_web::test]
async fn error_status_fails_fetch() {
    let (base, _) = start_server(Mode::Failing).await;

    match repo(&base).fetch_posts().await {
        Err(RepoError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[actix_web::test]
async fn undecodable_feed_fails_fetch() {
    let (base, _) = start_server(Mode::Garbage).await;

    let result = repo(&base).fetch_posts().await;
    assert!(matches!(result, Err(RepoError::Serde(_))));
}

#[actix_web::test]
async fn unreachable_server_is_http_error() {
    let result = repo("http://127.0.0.1:1").fetch_posts().await;
    assert!(matches!(result, Err(RepoError::Http(_))));
}

#[actix_web::test]
async fn create_sends_multipart_with_image_and_data_parts() {
    let (base, recorded) = start_server(Mode::Healthy).await;
    let upload = upload();
    let file_name = upload.file_name.clone();

    repo(&base).create_post(upload).await.unwrap();

    assert_eq!(*recorded.posts.lock().unwrap(), 1);
    let content_type = recorded.content_type.lock().unwrap().clone().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert_eq!(
        recorded.accept.lock().unwrap().as_deref(),
        Some("application/json")
    );

    let body = String::from_utf8_lossy(&recorded.body.lock().unwrap()).into_owned();
    assert!(body.contains(&format!(
        "name=\"files.image\"; filename=\"{}\"",
        file_name
    )));
    assert!(body.contains("Content-Type: image/jpeg"));
    assert!(body.contains("jpeg-bytes"));
    assert!(body.contains("name=\"data\""));
    assert!(body.contains(r#"{"message":"hello world","nickname":"Alice"}"#));
}

#[actix_web::test]
async fn rejected_create_reports_status() {
    let (base, recorded) = start_server(Mode::Failing).await;

    match repo(&base).create_post(upload()).await {
        Err(RepoError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "try later");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert_eq!(*recorded.posts.lock().unwrap(), 1);
}
