// Supported locales and their prompt/fallback templates. One lookup table,
// `en` as the required default; template text is policy the host may
// eventually override, not part of the engine contract.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
    Ja,
    Es,
}

impl Locale {
    /// Parse a BCP 47-ish tag; unknown tags fall back to `en`.
    #[inline]
    pub fn parse(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_lowercase();
        match primary.as_str() {
            "zh" => Self::Zh,
            "ja" => Self::Ja,
            "es" => Self::Es,
            _ => Self::En,
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
            Self::Ja => "ja",
            Self::Es => "es",
        }
    }
}

pub struct LocaleTemplates {
    /// Human-readable name of the target language.
    pub language_name: &'static str,
    /// Strong respond-only-in-this-language instruction, prepended to the
    /// system prompt to keep the completion service off its pivot language.
    pub language_instruction: &'static str,
    pub preamble_normal: &'static str,
    pub preamble_concise: &'static str,
    /// Canned answers used when the completion service fails.
    pub fallback_lines: &'static [&'static str],
    /// Disclosure prefix required when nothing relevant was retrieved.
    pub nothing_found_disclosure: &'static str,
}

static EN: LocaleTemplates = LocaleTemplates {
    language_name: "English",
    language_instruction: "You must respond in English only. Do not switch to any other language \
                           under any circumstances, even if the document content is not in English.",
    preamble_normal: "You are a careful assistant answering questions about a document. Answer in \
                      English, be accurate, and cite page numbers where asked.",
    preamble_concise: "You are a fast assistant answering questions about a document. Answer in \
                       English, in two or three short sentences, citing page numbers where asked.",
    fallback_lines: &[
        "I ran into a temporary problem while generating the answer. Please try again in a moment.",
        "Something went wrong while composing the answer. Please ask again shortly.",
        "The answer service is briefly unavailable. Please retry your question in a moment.",
    ],
    nothing_found_disclosure: "No closely related content was found in the document, so the \
                               following is based on general knowledge.",
};

static ZH: LocaleTemplates = LocaleTemplates {
    language_name: "中文",
    language_instruction: "你必须只用中文回答。无论文档内容使用什么语言，都绝对不要使用其他语言回答。",
    preamble_normal: "你是一个认真细致的文档问答助手。请用中文回答，保证准确，并按要求标注页码。",
    preamble_concise: "你是一个快速简洁的文档问答助手。请用中文回答，控制在两三句话内，并按要求标注页码。",
    fallback_lines: &[
        "生成回答时遇到了临时问题，请稍后再试。",
        "回答服务暂时不可用，请稍后重新提问。",
        "抱歉，刚才没能完成回答，请稍等片刻再试一次。",
    ],
    nothing_found_disclosure: "未能在文档中找到与问题密切相关的内容，以下回答基于通用知识。",
};

static JA: LocaleTemplates = LocaleTemplates {
    language_name: "日本語",
    language_instruction: "必ず日本語だけで回答してください。文書の言語にかかわらず、他の言語は決して使わないでください。",
    preamble_normal: "あなたは文書について質問に答える丁寧なアシスタントです。日本語で正確に回答し、指示に従ってページ番号を示してください。",
    preamble_concise: "あなたは文書について素早く答えるアシスタントです。日本語で2〜3文以内に回答し、指示に従ってページ番号を示してください。",
    fallback_lines: &[
        "回答の生成中に一時的な問題が発生しました。しばらくしてからもう一度お試しください。",
        "回答サービスが一時的に利用できません。少し待ってから再度質問してください。",
    ],
    nothing_found_disclosure: "文書内に質問と密接に関連する内容が見つからなかったため、以下は一般知識に基づく回答です。",
};

static ES: LocaleTemplates = LocaleTemplates {
    language_name: "español",
    language_instruction: "Debes responder únicamente en español. No cambies a ningún otro idioma \
                           bajo ninguna circunstancia, aunque el documento esté en otro idioma.",
    preamble_normal: "Eres un asistente cuidadoso que responde preguntas sobre un documento. \
                      Responde en español, con precisión, citando páginas cuando se pida.",
    preamble_concise: "Eres un asistente rápido que responde preguntas sobre un documento. \
                       Responde en español en dos o tres frases, citando páginas cuando se pida.",
    fallback_lines: &[
        "Hubo un problema temporal al generar la respuesta. Inténtalo de nuevo en un momento.",
        "El servicio de respuestas no está disponible por ahora. Vuelve a preguntar en un momento.",
    ],
    nothing_found_disclosure: "No se encontró contenido estrechamente relacionado en el documento, \
                               así que la siguiente respuesta se basa en conocimiento general.",
};

/// Template lookup for a locale.
#[inline]
pub fn templates(locale: Locale) -> &'static LocaleTemplates {
    match locale {
        Locale::En => &EN,
        Locale::Zh => &ZH,
        Locale::Ja => &JA,
        Locale::Es => &ES,
    }
}
