// Translation view: language pair, confidence and the translated text.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;

use super::{heading, render_result, styled_lines};
use crate::api::models::{LanguageMap, Translation};
use crate::protocol::{AnalysisResult, TabId};
use crate::render::languages::{confidence_percent, language_name};
use crate::theme::Palette;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let palette = state.palette();
    let body = match state.panel(TabId::Translate).and_then(|p| p.result.as_ref()) {
        Some(AnalysisResult::Translation(translation)) => {
            body_lines(translation, &state.languages, &palette)
        }
        _ => Vec::new(),
    };
    render_result(frame, area, state, TabId::Translate, body);
}

pub fn body_lines(
    translation: &Translation,
    languages: &LanguageMap,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let source = language_name(languages, &translation.source_language);
    let target = language_name(languages, &translation.target_language);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                source,
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" → ", Style::default().fg(palette.text_muted)),
            Span::styled(
                target,
                Style::default()
                    .fg(palette.primary)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Confidence: ", Style::default().fg(palette.text_secondary)),
            Span::styled(
                confidence_percent(translation.confidence),
                Style::default().fg(palette.success),
            ),
        ]),
        Line::default(),
        heading("Translation", palette),
    ];
    lines.extend(styled_lines(vec![(
        translation.translated_text.clone(),
        Style::default().fg(palette.text),
    )]));

    if !translation.original_text.is_empty() {
        lines.push(Line::default());
        lines.push(heading("Original", palette));
        lines.extend(styled_lines(vec![(
            translation.original_text.clone(),
            Style::default().fg(palette.text_secondary),
        )]));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PanelSnapshot, RequestStatus};
    use crate::theme::ThemeMode;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn translation() -> Translation {
        Translation {
            original_text: "Hello".into(),
            translated_text: "Hola".into(),
            source_language: "en".into(),
            target_language: "es".into(),
            confidence: 0.936,
        }
    }

    #[test]
    fn resolves_names_and_confidence() {
        let languages: LanguageMap = [("en", "english"), ("es", "spanish")]
            .into_iter()
            .map(|(c, n)| (c.to_string(), n.to_string()))
            .collect();
        let all = texts(&body_lines(
            &translation(),
            &languages,
            &Palette::for_mode(ThemeMode::Dark),
        ));
        assert_eq!(all[0], "English → Spanish");
        assert_eq!(all[1], "Confidence: 94%");
        assert_eq!(all[4], "Hola");
        assert!(all.contains(&"Hello".to_string()));
    }

    #[test]
    fn unknown_codes_fall_back() {
        let all = texts(&body_lines(
            &translation(),
            &LanguageMap::new(),
            &Palette::for_mode(ThemeMode::Dark),
        ));
        assert_eq!(all[0], "en → es");
    }

    #[test]
    fn render_does_not_panic() {
        let mut state = ViewState::default();
        state.panels.insert(
            TabId::Translate,
            PanelSnapshot {
                tab: TabId::Translate,
                status: RequestStatus::Complete,
                result: Some(AnalysisResult::Translation(translation())),
                error: None,
            },
        );
        let backend = ratatui::backend::TestBackend::new(60, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
