use crate::schedule::Color;
use crate::schedule::Event;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

/// An event as the month-grid widget consumes it
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetEvent {
    pub title: String,
    /// Serialized as `YYYY-MM-DD`
    pub start: NaiveDate,
    pub all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub extended_props: ExtendedProps,
}

/// Data the widget hands back when an event is clicked
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedProps {
    pub detail: String,
    /// Category label (`전형일`, `1단계 발표`, `최종 발표`)
    pub cat: String,
}

impl From<&Event> for WidgetEvent {
    fn from(event: &Event) -> Self {
        WidgetEvent {
            title: event.title.clone(),
            start: event.date,
            all_day: true,
            color: event.color,
            extended_props: ExtendedProps {
                detail: event.detail.clone(),
                cat: event.category.label().to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Category;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn event(category: Category, color: Option<Color>) -> Event {
        Event {
            title: "12/김하늘/서울/면접".to_owned(),
            date: NaiveDate::from_ymd_opt(2025, 11, 15).expect("valid date"),
            category,
            color,
            detail: "12 / 김하늘 / 메모".to_owned(),
        }
    }

    #[test]
    fn serializes_widget_shape() -> Result<(), serde_json::Error> {
        let widget = WidgetEvent::from(&event(Category::StageOneResult, Some(Color::Yellow)));
        assert_eq!(
            serde_json::to_value(&widget)?,
            json!({
                "title": "12/김하늘/서울/면접",
                "start": "2025-11-15",
                "allDay": true,
                "color": "yellow",
                "extendedProps": {"detail": "12 / 김하늘 / 메모", "cat": "1단계 발표"},
            })
        );
        Ok(())
    }

    #[test]
    fn omits_absent_color() -> Result<(), serde_json::Error> {
        let widget = WidgetEvent::from(&event(Category::Screening, None));
        let value = serde_json::to_value(&widget)?;
        assert!(value.get("color").is_none());
        assert_eq!(value["extendedProps"]["cat"], "전형일");
        Ok(())
    }
}
