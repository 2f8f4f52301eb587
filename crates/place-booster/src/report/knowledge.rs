use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

const CHUNK_SIZE: usize = 1000;
const CHUNK_OVERLAP: usize = 200;
const MIN_CHUNK_CHARS: usize = 50;

const DEFAULT_GUIDE: &str = "네이버 스마트 플레이스 최적화를 위한 기본 가이드:
1. 정확한 기본 정보 입력하기: 주소, 영업시간, 휴무일, 전화번호를 빠짐없이 등록합니다.
2. 매력적인 이미지 사용하기: 매장 외관, 내부, 대표 메뉴를 고화질로 촬영해 등록합니다.
3. 키워드 최적화하기: 지역명, 업종, 상황을 조합한 대표 키워드를 설정합니다.
4. 고객 리뷰 관리하기: 모든 리뷰에 빠르게 답변하고 영수증 리뷰를 유도합니다.
5. 정기적인 업데이트하기: 소식, 이벤트, 메뉴 변경 사항을 꾸준히 올립니다.";

/// Retrieved text used to ground model prompts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Passage {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub content: String,
    pub relevance: u32,
}

/// Source of reference passages for report and consultation prompts.
pub trait KnowledgeBase: Send + Sync {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Passage>, KnowledgeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge content at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("knowledge base unavailable: {0}")]
    Unavailable(String),
}

/// Raw document before chunking.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone)]
struct Chunk {
    source: String,
    section: Option<String>,
    content: String,
    folded: String,
}

/// In-memory corpus ranked by query-term overlap.
#[derive(Debug, Clone)]
pub struct TextCorpus {
    chunks: Vec<Chunk>,
}

impl TextCorpus {
    /// Loads `*.txt` files below `data_dir/content` plus
    /// `data_dir/ebook_content.txt`. Falls back to a built-in guide when
    /// neither yields any text.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let data_dir = data_dir.as_ref();
        let mut files = Vec::new();

        let content_dir = data_dir.join("content");
        if content_dir.is_dir() {
            collect_text_files(&content_dir, &mut files)?;
        }
        files.sort();

        let ebook = data_dir.join("ebook_content.txt");
        if ebook.is_file() {
            files.push(ebook);
        }

        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            match fs::read_to_string(&path) {
                Ok(text) => documents.push(Document {
                    source: path.display().to_string(),
                    text,
                }),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unreadable knowledge file");
                }
            }
        }

        let corpus = Self::from_documents(documents);
        if corpus.is_empty() {
            tracing::info!(data_dir = %data_dir.display(), "no knowledge content found; using built-in guide");
            return Ok(Self::default_guide());
        }

        tracing::info!(chunks = corpus.len(), "knowledge corpus loaded");
        Ok(corpus)
    }

    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let chunks = documents
            .into_iter()
            .flat_map(|document| {
                let text = preprocess(&document.text);
                split_chunks(&text)
                    .into_iter()
                    .map(|content| Chunk {
                        source: document.source.clone(),
                        section: section_heading(&content),
                        folded: content.to_lowercase(),
                        content,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { chunks }
    }

    pub fn default_guide() -> Self {
        Self::from_documents([Document {
            source: "default_content.txt".to_string(),
            text: DEFAULT_GUIDE.to_string(),
        }])
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl KnowledgeBase for TextCorpus {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Passage>, KnowledgeError> {
        let terms = query_terms(query);
        if terms.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(u32, &Chunk)> = self
            .chunks
            .iter()
            .map(|chunk| {
                let hits = terms
                    .iter()
                    .map(|term| chunk.folded.matches(term.as_str()).count() as u32)
                    .sum();
                (hits, chunk)
            })
            .filter(|(hits, _)| *hits > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(relevance, chunk)| Passage {
                source: chunk.source.clone(),
                section: chunk.section.clone(),
                content: chunk.content.clone(),
                relevance,
            })
            .collect())
    }
}

fn collect_text_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), KnowledgeError> {
    let entries = fs::read_dir(dir).map_err(|source| KnowledgeError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let path = entry
            .map_err(|source| KnowledgeError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_dir() {
            collect_text_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    Ok(())
}

/// Normalizes line endings, drops bare page-number lines and collapses runs
/// of blank lines.
fn preprocess(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.replace("\r\n", "\n").lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        cleaned.push_str(line.trim_end());
        cleaned.push('\n');
    }

    cleaned.trim().to_string()
}

/// Character windows of at most `CHUNK_SIZE`, preferring to end on a line or
/// word break, each overlapping the previous by `CHUNK_OVERLAP`.
fn split_chunks(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + CHUNK_SIZE).min(chars.len());
        if end < chars.len() {
            let floor = start + CHUNK_SIZE / 2;
            if let Some(offset) = chars[floor..end]
                .iter()
                .rposition(|c| *c == '\n' || c.is_whitespace())
            {
                end = floor + offset + 1;
            }
        }

        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if chunk.chars().count() >= MIN_CHUNK_CHARS {
            chunks.push(chunk.to_string());
        }

        if end == chars.len() {
            break;
        }
        start = end.saturating_sub(CHUNK_OVERLAP).max(start + 1);
    }

    chunks
}

fn section_heading(chunk: &str) -> Option<String> {
    chunk
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with('#'))
        .map(|line| line.trim_start_matches('#').trim().to_string())
        .filter(|heading| !heading.is_empty())
}

fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = query
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .map(str::to_lowercase)
        .filter(|term| term.chars().count() >= 2)
        .collect();
    terms.sort();
    terms.dedup();
    terms
}
