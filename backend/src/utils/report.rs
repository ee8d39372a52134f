use crate::funnel::counter::format_fr;
use crate::models::analysis_models::{AnalysisData, CalculatedMetrics};

const REPORT_STYLE: &str = r#"
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
        .container { max-width: 600px; margin: 0 auto; padding: 20px; }
        .header { background: linear-gradient(135deg, #3b82f6, #1d4ed8); color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0; }
        .content { background: #f8fafc; padding: 30px; }
        .metric-card { background: white; padding: 20px; margin: 15px 0; border-radius: 8px; border-left: 4px solid #3b82f6; }
        .score { font-size: 24px; font-weight: bold; color: #1d4ed8; }
        .recommendations { background: white; padding: 20px; margin: 20px 0; border-radius: 8px; }
        .footer { background: #1e293b; color: white; padding: 20px; text-align: center; border-radius: 0 0 10px 10px; }
        .cta-button { background: #3b82f6; color: white; padding: 15px 30px; text-decoration: none; border-radius: 8px; display: inline-block; margin: 20px 0; }
"#;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn report_subject(data: &AnalysisData) -> String {
    format!("Votre analyse personnalisée est prête, {} !", data.contact.first_name)
}

// Scores that could not be computed print as "NaN", like the funnel does.
fn score_text(score: Option<i64>) -> String {
    score.map(|v| v.to_string()).unwrap_or_else(|| "NaN".to_string())
}

fn amount_text(amount: Option<i64>) -> String {
    format_fr(amount.map(|v| v as f64).unwrap_or(f64::NAN), 0)
}

fn metric_card(title: &str, score: &str, caption: &str) -> String {
    format!(
        r#"
          <div class="metric-card">
            <h3>{title}</h3>
            <div class="score">{score}</div>
            <p>{caption}</p>
          </div>"#
    )
}

pub fn render_report_html(data: &AnalysisData, metrics: &CalculatedMetrics, booking_url: &str) -> String {
    let full_name = escape_html(&data.contact.full_name());
    let recommendations: String = metrics
        .recommendations
        .iter()
        .map(|rec| format!("<li>{}</li>", escape_html(rec)))
        .collect();

    let cards = [
        metric_card(
            "Score de Maturité Digitale",
            &format!("{}/100", score_text(metrics.digital_maturity_score)),
            "Votre niveau actuel de digitalisation des processus.",
        ),
        metric_card(
            "💰 Économies Potentielles",
            &format!("{}€/mois", amount_text(metrics.potential_monthly_savings)),
            "Gains en efficacité possible avec une optimisation de vos processus.",
        ),
        metric_card(
            "📈 CA Additionnel Potentiel",
            &format!("{}€/mois", amount_text(metrics.additional_revenue_opportunity)),
            "Revenus supplémentaires possible avec une meilleure conversion.",
        ),
        metric_card(
            "🚀 Score d'Optimisation Global",
            &format!("{}/100", score_text(metrics.overall_optimization_score)),
            "Votre potentiel d'amélioration global.",
        ),
    ]
    .concat();

    let booking_url = escape_html(booking_url);

    format!(
        r#"<!DOCTYPE html>
    <html>
    <head>
      <meta charset="utf-8">
      <style>{REPORT_STYLE}</style>
    </head>
    <body>
      <div class="container">
        <div class="header">
          <h1>Votre Analyse Little John</h1>
          <p>Rapport personnalisé pour {full_name}</p>
        </div>
        <div class="content">
          <h2>🎯 Vos Résultats d'Analyse</h2>
          {cards}
          <div class="recommendations">
            <h3>🎯 Vos Recommandations Prioritaires</h3>
            <ul>
              {recommendations}
            </ul>
          </div>
          <div style="text-align: center;">
            <p><strong>Prêt à passer à l'étape suivante ?</strong></p>
            <a href="{booking_url}" class="cta-button">
              Planifier un rendez-vous gratuit
            </a>
          </div>
        </div>
        <div class="footer">
          <p><strong>Little John</strong> - Solutions d'Optimisation pour Courtiers</p>
          <p>Transformez votre activité avec nos outils dédiés</p>
        </div>
      </div>
    </body>
    </html>"#
    )
}
