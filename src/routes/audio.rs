use actix_multipart::Multipart;
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use futures_util::StreamExt;
use std::path::PathBuf;
use validator::Validate;
use crate::models::{EchoAudioResponse, ProcessAudioResponse, TextToSpeechRequest, TranscriptionResponse};
use crate::routes::{error_response, AppState};
use crate::services::{AudioStorage, Emotion, StorageError};

/// Configure voice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/process-audio", web::post().to(process_audio))
        .route("/audio/speech-to-text", web::post().to(speech_to_text))
        .route("/audio/text-to-speech", web::post().to(text_to_speech))
        .route("/audio/process", web::post().to(echo_audio))
        .route("/audio/{filename}", web::get().to(get_audio));
}

fn storage_error(err: StorageError) -> HttpResponse {
    let status = match &err {
        StorageError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        StorageError::EmptyUpload | StorageError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, "Audio storage error", err)
}

/// Multipart field carrying the recording
const AUDIO_FIELD: &str = "audio_file";

/// Buffer the `audio_file` multipart field to the upload directory
///
/// Other fields are skipped. A form without `audio_file` is a 400.
async fn save_multipart_upload(
    mut payload: Multipart,
    storage: &AudioStorage,
) -> Result<PathBuf, HttpResponse> {
    let invalid = |e: actix_multipart::MultipartError| {
        error_response(StatusCode::BAD_REQUEST, "Invalid multipart payload", e)
    };
    let mut audio: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(invalid)?;
        let is_audio = field.name() == Some(AUDIO_FIELD);

        if !is_audio || audio.is_some() {
            while let Some(chunk) = field.next().await {
                chunk.map_err(invalid)?;
            }
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(invalid)?;
            storage.check_size(bytes.len() + chunk.len()).map_err(storage_error)?;
            bytes.extend_from_slice(&chunk);
        }
        audio = Some(bytes);
    }

    let bytes = audio.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "Missing audio file",
            format!("Multipart form has no '{}' field", AUDIO_FIELD),
        )
    })?;

    storage.save_upload(&bytes).await.map_err(storage_error)
}

/// Remove an upload once the response is on its way
fn discard_later(path: PathBuf) {
    actix_web::rt::spawn(async move {
        AudioStorage::discard(&path).await;
    });
}

/// Full voice pipeline
///
/// POST /process-audio (multipart form, field `audio_file`)
async fn process_audio(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    let upload = match save_multipart_upload(payload, &state.storage).await {
        Ok(path) => path,
        Err(response) => return response,
    };

    let result = state.pipeline.process(&upload).await;
    discard_later(upload);

    match result {
        Ok(outcome) => HttpResponse::Ok().json(ProcessAudioResponse {
            text: outcome.text,
            intent: outcome.intent,
            schemes: outcome.schemes,
            response: outcome.response,
            audio_url: AudioStorage::audio_url(&outcome.audio_path),
        }),
        Err(e) => {
            tracing::error!("Error processing audio: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error processing audio", e)
        }
    }
}

/// POST /audio/speech-to-text (multipart form, field `audio_file`)
async fn speech_to_text(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    let upload = match save_multipart_upload(payload, &state.storage).await {
        Ok(path) => path,
        Err(response) => return response,
    };

    let result = state.pipeline.transcribe(&upload).await;
    AudioStorage::discard(&upload).await;

    match result {
        Ok(text) => HttpResponse::Ok().json(TranscriptionResponse { text }),
        Err(e) => {
            tracing::error!("Error transcribing audio: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error transcribing audio", e)
        }
    }
}

/// POST /audio/text-to-speech
///
/// Request body:
/// ```json
/// { "text": "string", "emotion": "neutral|confused|excited|empathetic" }
/// ```
async fn text_to_speech(
    state: web::Data<AppState>,
    req: web::Json<TextToSpeechRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let emotion = req
        .emotion
        .as_deref()
        .map(Emotion::from_tag)
        .unwrap_or_default();

    let path = match state.pipeline.speak(&req.text, emotion).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Error generating speech: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error generating speech", e);
        }
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => HttpResponse::Ok().content_type("audio/mpeg").body(bytes),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error reading speech", e),
    }
}

/// Transcribe and speak the transcription back
///
/// POST /audio/process (multipart form, field `audio_file`)
async fn echo_audio(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    let upload = match save_multipart_upload(payload, &state.storage).await {
        Ok(path) => path,
        Err(response) => return response,
    };

    let result = state.pipeline.echo(&upload).await;
    discard_later(upload);

    match result {
        Ok((text, reply)) => HttpResponse::Ok().json(EchoAudioResponse {
            text,
            audio_url: AudioStorage::audio_url(&reply),
        }),
        Err(e) => {
            tracing::error!("Error processing audio: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error processing audio", e)
        }
    }
}

/// Serve a generated reply
///
/// GET /audio/{filename}
async fn get_audio(state: web::Data<AppState>, filename: web::Path<String>) -> impl Responder {
    let path = match state.storage.resolve_audio(&filename).await {
        Ok(path) => path,
        Err(StorageError::NotFound(_)) => {
            return error_response(StatusCode::NOT_FOUND, "Audio file not found", filename.as_str());
        }
        Err(e) => return storage_error(e),
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => HttpResponse::Ok().content_type("audio/mpeg").body(bytes),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error reading audio", e),
    }
}
