//! Run with: cargo run --bin summarize -- peticao.pdf notas.txt

use anyhow::{bail, Context};
use defensoria::config::settings::Settings;
use defensoria::services::extractor::{self, mime_from_extension, UploadedFile};
use defensoria::services::llm::LlmClient;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        bail!("usage: summarize <file.pdf|file.txt>...");
    }

    let settings = Settings::from_env()?;

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path))?;
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());

        files.push(UploadedFile {
            mime_type: mime_from_extension(&name).to_string(),
            name,
            bytes,
        });
    }

    let client = LlmClient::new(settings.groq_base_url.clone());
    let api_key = settings.resolve_api_key(None);

    if api_key.is_empty() {
        println!("⚠️  GROQ_API_KEY not set, only extracting.\n");
    }

    for (file, result) in files.iter().zip(extractor::extract_all(&files)) {
        println!("{:-<80}", "");
        println!("📘 {} ({})", file.name, file.mime_type);

        let doc = match result {
            Ok(doc) if doc.is_empty() => {
                println!("⚠️  No content extracted.");
                continue;
            }
            Ok(doc) => doc,
            Err(e) => {
                println!("❌ {}", e);
                continue;
            }
        };

        println!("📝 {} characters", doc.char_count());
        println!("{}\n", extractor::truncate_chars(&doc.text, 300));

        if api_key.is_empty() {
            continue;
        }

        let input = extractor::truncate_chars(&doc.text, settings.summary_input_chars);
        match client
            .summarize(input, settings.default_model.as_str(), &api_key)
            .await
        {
            Ok(summary) => println!("✅ Resumo:\n{}\n", summary),
            Err(e) => println!("❌ {}\n", e),
        }
    }

    Ok(())
}
