use crate::core::descriptions::PowerScale;
use crate::domain::model::{
    Aspect, FaceReading, FinalScoreVector, Recommendation, RemedyPreview, ZodiacRecord,
};
use crate::domain::ports::ReadingRenderer;

/// Prints readings to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn aspect_icon(aspect: Aspect) -> &'static str {
    match aspect {
        Aspect::Work => "💼",
        Aspect::Finance => "💰",
        Aspect::Love => "❤️",
        Aspect::Health => "🌿",
        Aspect::Protection => "🛡️",
    }
}

fn print_vector(scores: &FinalScoreVector) {
    for (aspect, score) in scores.iter() {
        println!(
            "   {} {:<11} {:>3}  {}",
            aspect_icon(aspect),
            aspect.as_str(),
            score,
            PowerScale::from_score(score)
        );
    }
}

impl ReadingRenderer for ConsoleRenderer {
    fn render_face(&mut self, face: &FaceReading) {
        println!("👤 Face reading");
        for description in &face.descriptions {
            println!(
                "   {} {} ({}): {}",
                aspect_icon(description.aspect),
                description.feature,
                description.score,
                description.summary
            );
            if !description.detail.is_empty() {
                println!("      {}", description.detail);
            }
        }
    }

    fn render_zodiac(&mut self, sign: &str, record: Option<&ZodiacRecord>) {
        println!("✨ Zodiac: {}", sign);
        if let Some(record) = record {
            for aspect in Aspect::ALL {
                let text = record.text(aspect);
                if !text.is_empty() {
                    println!("   {} {}", aspect_icon(aspect), text);
                }
            }
        }
    }

    fn render_scores(&mut self, scores: &FinalScoreVector) {
        println!("📊 Combined scores");
        print_vector(scores);
    }

    fn render_recommendation(&mut self, recommendation: &Recommendation) {
        println!("🔻 Weakest aspect: {}", recommendation.weakest);
        match &recommendation.remedy {
            Some(remedy) => {
                println!("🙏 Recommended remedy: {}", remedy.name);
                if !remedy.description.is_empty() {
                    println!("   {}", remedy.description);
                }
                if !remedy.product_link.is_empty() {
                    println!("   🔗 {}", remedy.product_link);
                }
            }
            None => println!("🙏 No remedy available"),
        }
    }

    fn render_narrative(&mut self, text: &str) {
        println!("🔮 {}", text);
    }

    fn render_preview(&mut self, preview: &RemedyPreview) {
        println!("🪔 With {}", preview.remedy.name);
        for (aspect, boosted) in preview.boosted.iter() {
            let before = preview.before[aspect];
            println!(
                "   {} {:<11} {:>3} -> {:>3}  {}",
                aspect_icon(aspect),
                aspect.as_str(),
                before,
                boosted,
                PowerScale::from_score(boosted)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AspectBoosts, RemedyRecord};

    #[test]
    fn test_renders_every_section() {
        let remedy = RemedyRecord {
            name: "Lakshmi".to_string(),
            boosts: AspectBoosts {
                finance: 4,
                ..Default::default()
            },
            image: String::new(),
            description: "Goddess of wealth".to_string(),
            product_link: String::new(),
        };
        let scores = FinalScoreVector::new([10, 3, 8, 6, 9]);
        let mut renderer = ConsoleRenderer::new();

        renderer.render_zodiac("Unknown", None);
        renderer.render_scores(&scores);
        renderer.render_recommendation(&Recommendation {
            weakest: Aspect::Finance,
            remedy: Some(remedy.clone()),
        });
        renderer.render_narrative("A bright year");
        renderer.render_preview(&crate::core::recommend::preview(&scores, &remedy));
    }
}
