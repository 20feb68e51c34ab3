pub mod embed_service;
pub mod generation_service;
pub mod question_service;
