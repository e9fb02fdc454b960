use crate::map::Popup;
use crate::types::{Activity, Workout, WorkoutId, WorkoutKind};

/// Rendered workout list. Newest entries go on top.
pub trait WorkoutList {
    fn prepend(&mut self, id: &WorkoutId, html: String);
    fn replace(&mut self, id: &WorkoutId, html: String);
    fn remove(&mut self, id: &WorkoutId);
    fn clear(&mut self);
}

/// List that keeps the rendered fragments in display order.
#[derive(Debug, Clone, Default)]
pub struct MemoryList {
    pub entries: Vec<(WorkoutId, String)>,
}

impl MemoryList {
    pub fn get(&self, id: &WorkoutId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(eid, _)| eid == id)
            .map(|(_, html)| html.as_str())
    }

    pub fn ids(&self) -> Vec<&WorkoutId> {
        self.entries.iter().map(|(id, _)| id).collect()
    }
}

impl WorkoutList for MemoryList {
    fn prepend(&mut self, id: &WorkoutId, html: String) {
        self.entries.insert(0, (id.clone(), html));
    }

    fn replace(&mut self, id: &WorkoutId, html: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(eid, _)| eid == id) {
            entry.1 = html;
        }
    }

    fn remove(&mut self, id: &WorkoutId) {
        self.entries.retain(|(eid, _)| eid != id);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

const fn icon(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running => "🏃‍♂️",
        WorkoutKind::Cycling => "🚴‍♀️",
    }
}

fn detail_row(html: &mut String, icon: &str, value: &str, unit: &str) {
    html.push_str(&format!(
        r#"
  <div class="workout__details">
    <span class="workout__icon">{icon}</span>
    <span class="workout__value">{value}</span>
    <span class="workout__unit">{unit}</span>
  </div>"#
    ));
}

/// Escapes text for an HTML attribute value or element body.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// List entry fragment for one workout.
pub fn workout_html(w: &Workout) -> String {
    let kind = w.kind();
    let mut html = format!(
        r#"<li class="workout workout--{kind}" data-id="{id}">
  <h2 class="workout__title">{title}</h2>
  <div class="workout__actions">
    <i class="workout__action fa-solid fa-pen fa-xl"></i>
    <i class="workout__action fa-solid fa-trash-can fa-xl"></i>
  </div>"#,
        id = escape_html(w.id().as_str()),
        title = escape_html(w.description()),
    );

    detail_row(&mut html, icon(kind), &w.distance().to_string(), "km");
    detail_row(&mut html, "⏱", &w.duration().to_string(), "min");

    match *w.activity() {
        Activity::Running { cadence, pace } => {
            detail_row(&mut html, "⚡️", &format!("{pace:.1}"), "min/km");
            detail_row(&mut html, "🦶🏼", &cadence.to_string(), "spm");
        }
        Activity::Cycling {
            elevation_gain,
            speed,
        } => {
            detail_row(&mut html, "⚡️", &format!("{speed:.1}"), "km/h");
            detail_row(&mut html, "⛰", &elevation_gain.to_string(), "m");
        }
    }

    html.push_str("\n</li>\n");
    html
}

pub fn popup(w: &Workout) -> Popup {
    Popup {
        content: w.description().to_string(),
        class_name: format!("{}-popup", w.kind()),
        max_width: 250,
        min_width: 100,
        auto_close: false,
        close_on_click: false,
    }
}

/// One terminal line per workout.
pub fn summary_line(w: &Workout) -> String {
    let metric = match *w.activity() {
        Activity::Running { cadence, pace } => format!("{pace:.1} min/km\t{cadence} spm"),
        Activity::Cycling {
            elevation_gain,
            speed,
        } => format!("{speed:.1} km/h\t{elevation_gain} m"),
    };
    format!(
        "{}\t{}\t{}\t{} km\t{} min\t{metric}",
        w.id(),
        w.description(),
        w.coords(),
        w.distance(),
        w.duration(),
    )
}
