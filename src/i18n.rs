use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Es,
    En,
    Kr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "ES",
            Language::En => "EN",
            Language::Kr => "KR",
        }
    }

    pub fn all() -> [Language; 3] { [Language::Es, Language::En, Language::Kr] }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Settings,
    Appearance,
    Dark,
    Light,
    Language,
    HighPrecision,
    HighPrecisionHint,
    EditorSection,
    ResetToolsOnUndo,
    HistoryLimit,
    Unlimited,
    AiSection,
    ApiKey,
    ApiKeyFromEnv,
    Undo,
    Save,
    ExportLab,
    OpenImage,
    OpenHint,
    ToolAdjust,
    ToolFilter,
    ToolAi,
    ToolTransform,
    ToolMore,
    PanelAdjust,
    PanelFilter,
    PanelAi,
    PanelTransform,
    PanelMore,
    Brightness,
    Contrast,
    Saturation,
    Reset,
    Rotation,
    FlipHorizontal,
    FlipVertical,
    Aspect,
    PromptHint,
    Send,
    MagicEraser,
    RelightPro,
    Processing,
    EditApplied,
    Exported,
    Close,
}

pub fn tr(lang: Language, label: Label) -> &'static str {
    use Label::*;
    use crate::i18n::Language as Lang;
    match (label, lang) {
        (Settings, Lang::Es) => "Ajustes",
        (Settings, Lang::En) => "Settings",
        (Settings, Lang::Kr) => "설정",
        (Appearance, Lang::Es) => "Apariencia",
        (Appearance, Lang::En) => "Appearance",
        (Appearance, Lang::Kr) => "테마",
        (Dark, Lang::Es) => "Oscuro",
        (Dark, Lang::En) => "Dark",
        (Dark, Lang::Kr) => "다크",
        (Light, Lang::Es) => "Claro",
        (Light, Lang::En) => "Light",
        (Light, Lang::Kr) => "라이트",
        (Language, Lang::Es) => "Idioma",
        (Language, Lang::En) => "Language",
        (Language, Lang::Kr) => "언어",
        (HighPrecision, Lang::Es) => "Motor Neural Pro",
        (HighPrecision, Lang::En) => "Neural Engine Pro",
        (HighPrecision, Lang::Kr) => "뉴럴 엔진 프로",
        (HighPrecisionHint, Lang::Es) => "Remuestreo de alta fidelidad al exportar",
        (HighPrecisionHint, Lang::En) => "High-fidelity resampling on export",
        (HighPrecisionHint, Lang::Kr) => "내보내기 시 고품질 리샘플링",
        (EditorSection, Lang::Es) => "Editor",
        (EditorSection, Lang::En) => "Editor",
        (EditorSection, Lang::Kr) => "편집기",
        (ResetToolsOnUndo, Lang::Es) => "Deshacer restablece los ajustes",
        (ResetToolsOnUndo, Lang::En) => "Undo resets adjustments",
        (ResetToolsOnUndo, Lang::Kr) => "실행 취소 시 조정 초기화",
        (HistoryLimit, Lang::Es) => "Límite del historial",
        (HistoryLimit, Lang::En) => "History limit",
        (HistoryLimit, Lang::Kr) => "기록 한도",
        (Unlimited, Lang::Es) => "sin límite",
        (Unlimited, Lang::En) => "unlimited",
        (Unlimited, Lang::Kr) => "무제한",
        (AiSection, Lang::Es) => "Galaxy AI Hub",
        (AiSection, Lang::En) => "Galaxy AI Hub",
        (AiSection, Lang::Kr) => "Galaxy AI 허브",
        (ApiKey, Lang::Es) => "Clave de API",
        (ApiKey, Lang::En) => "API key",
        (ApiKey, Lang::Kr) => "API 키",
        (ApiKeyFromEnv, Lang::Es) => "Usando la clave del entorno",
        (ApiKeyFromEnv, Lang::En) => "Using key from environment",
        (ApiKeyFromEnv, Lang::Kr) => "환경 변수의 키 사용 중",
        (Undo, Lang::Es) => "Deshacer",
        (Undo, Lang::En) => "Undo",
        (Undo, Lang::Kr) => "실행 취소",
        (Save, Lang::Es) => "Guardar",
        (Save, Lang::En) => "Save",
        (Save, Lang::Kr) => "저장",
        (ExportLab, _) => "Export Lab",
        (OpenImage, Lang::Es) => "Abrir imagen",
        (OpenImage, Lang::En) => "Open image",
        (OpenImage, Lang::Kr) => "이미지 열기",
        (OpenHint, Lang::Es) => "Haz clic o suelta una foto aquí",
        (OpenHint, Lang::En) => "Click or drop a photo here",
        (OpenHint, Lang::Kr) => "클릭하거나 사진을 여기로 끌어오세요",
        (ToolAdjust, _) => "Lab",
        (ToolFilter, _) => "Prism",
        (ToolAi, _) => "AI",
        (ToolTransform, _) => "Morph",
        (ToolMore, _) => "Nova",
        (PanelAdjust, _) => "Neural Tuning",
        (PanelFilter, _) => "Spectrum Prism",
        (PanelAi, _) => "Neural Workspace",
        (PanelTransform, _) => "Geometry",
        (PanelMore, _) => "Advanced",
        (Brightness, Lang::Es) => "Luminancia",
        (Brightness, Lang::En) => "Luminance",
        (Brightness, Lang::Kr) => "밝기",
        (Contrast, Lang::Es) => "Dinámica",
        (Contrast, Lang::En) => "Dynamics",
        (Contrast, Lang::Kr) => "대비",
        (Saturation, Lang::Es) => "Pureza",
        (Saturation, Lang::En) => "Purity",
        (Saturation, Lang::Kr) => "채도",
        (Reset, Lang::Es) => "Restablecer",
        (Reset, Lang::En) => "Reset",
        (Reset, Lang::Kr) => "초기화",
        (Rotation, Lang::Es) => "Rotación",
        (Rotation, Lang::En) => "Rotation",
        (Rotation, Lang::Kr) => "회전",
        (FlipHorizontal, Lang::Es) => "Voltear H",
        (FlipHorizontal, Lang::En) => "Flip H",
        (FlipHorizontal, Lang::Kr) => "좌우 반전",
        (FlipVertical, Lang::Es) => "Voltear V",
        (FlipVertical, Lang::En) => "Flip V",
        (FlipVertical, Lang::Kr) => "상하 반전",
        (Aspect, Lang::Es) => "Proporción",
        (Aspect, Lang::En) => "Aspect",
        (Aspect, Lang::Kr) => "비율",
        (PromptHint, Lang::Es) => "Describe tu visión...",
        (PromptHint, Lang::En) => "Describe your vision...",
        (PromptHint, Lang::Kr) => "원하는 편집을 설명하세요...",
        (Send, Lang::Es) => "Ejecutar",
        (Send, Lang::En) => "Run",
        (Send, Lang::Kr) => "실행",
        (MagicEraser, _) => "Magic Eraser",
        (RelightPro, _) => "Relight Pro",
        (Processing, _) => "Synthesizing...",
        (EditApplied, Lang::Es) => "Edición aplicada",
        (EditApplied, Lang::En) => "Edit applied",
        (EditApplied, Lang::Kr) => "편집 적용됨",
        (Exported, Lang::Es) => "Exportado a",
        (Exported, Lang::En) => "Exported to",
        (Exported, Lang::Kr) => "내보낸 위치",
        (Close, Lang::Es) => "Cerrar",
        (Close, Lang::En) => "Close",
        (Close, Lang::Kr) => "닫기",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switching_language_changes_labels() {
        assert_eq!(tr(Language::Es, Label::Undo), "Deshacer");
        assert_eq!(tr(Language::En, Label::Undo), "Undo");
        assert_ne!(tr(Language::Kr, Label::Brightness), tr(Language::En, Label::Brightness));
    }

    #[test]
    fn test_language_label_is_translated() {
        assert_eq!(tr(Language::Es, Label::Language), "Idioma");
        assert_eq!(tr(Language::En, Label::Language), "Language");
        assert_eq!(tr(Language::Kr, Label::Language), "언어");
    }

    #[test]
    fn test_brand_labels_are_shared() {
        for lang in Language::all() {
            assert_eq!(tr(lang, Label::ToolFilter), "Prism");
            assert_eq!(tr(lang, Label::ExportLab), "Export Lab");
        }
    }

    #[test]
    fn test_language_round_trips_through_settings_json() {
        let json = serde_json::to_string(&Language::Kr).unwrap();
        assert_eq!(serde_json::from_str::<Language>(&json).unwrap(), Language::Kr);
        assert_eq!(Language::default().code(), "ES");
    }
}
