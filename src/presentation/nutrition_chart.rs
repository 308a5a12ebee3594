use crate::i18n::Language;
use crate::recipe_model::Nutrition;

const BAR_WIDTH: usize = 24;

/// Macro split as horizontal bars, each scaled by its share of the total grams.
pub fn render(nutrition: &Nutrition, language: Language) -> String {
    let t = language.strings();
    let macros = [
        (t.protein, nutrition.protein),
        (t.carbs, nutrition.carbs),
        (t.fat, nutrition.fat),
    ];
    let total: f64 = macros.iter().map(|(_, v)| v.max(0.0)).sum();
    let label_width = macros.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    let mut lines = vec![
        t.nutrition_title.to_string(),
        format!("{} kcal", format_amount(nutrition.calories)),
    ];
    for (label, value) in macros {
        let share = if total > 0.0 { value.max(0.0) / total } else { 0.0 };
        let filled = ((share * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        lines.push(format!(
            "{:<lw$}  {}{}  {}g ({:.0}%)",
            label,
            "█".repeat(filled),
            "░".repeat(BAR_WIDTH - filled),
            format_amount(value),
            share * 100.0,
            lw = label_width,
        ));
    }
    lines.join("\n")
}

/// Whole numbers without decimals, everything else with one.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_follow_macro_shares() {
        let nutrition = Nutrition {
            calories: 500.0,
            protein: 30.0,
            carbs: 60.0,
            fat: 30.0,
        };
        let chart = render(&nutrition, Language::En);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "Nutrition per Serving");
        assert_eq!(lines[1], "500 kcal");
        assert_eq!(lines[2].matches('█').count(), 6);
        assert_eq!(lines[3].matches('█').count(), 12);
        assert!(lines[3].contains("60g (50%)"));
    }

    #[test]
    fn test_all_zero_macros_render_empty_bars() {
        let chart = render(&Nutrition::default(), Language::Pt);
        assert!(chart.starts_with("Nutrição por Porção"));
        assert_eq!(chart.matches('█').count(), 0);
        assert!(chart.contains("0g (0%)"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(12.0), "12");
        assert_eq!(format_amount(12.34), "12.3");
    }
}
