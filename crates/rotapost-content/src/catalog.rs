//! Static (content type, day) → body lookup table.
//!
//! Bodies carry Telegram HTML (`<b>…</b>`) because the publisher posts with
//! `parse_mode=HTML`. Daily types index by day; weekly types index by the
//! derived week: `week = (day - 1) / days_per_week + 1`.

use rotapost_core::types::ContentType;

use crate::error::{ContentError, Result};

/// Publication cadence of a content type within the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// A distinct body for every day of the cycle.
    Daily,
    /// One body per content week; repeats on every day of that week.
    Weekly,
}

pub fn cadence(content_type: ContentType) -> Cadence {
    match content_type {
        ContentType::DailyRule => Cadence::Daily,
        _ => Cadence::Weekly,
    }
}

const DAILY_RULES: [&str; 20] = [
    "🚦 <b>RULE OF THE DAY</b>\n\nOn receiving a stop signal, or on any sign of danger to traffic, the driver must immediately take every available measure to stop the train.",
    "👀 <b>RULE OF THE DAY</b>\n\nDrive with continuous observation of the track, instrument readings and lineside signals. Call out every signal aspect aloud and have the assistant confirm it.",
    "🛑 <b>RULE OF THE DAY</b>\n\nBefore departure the driver must confirm the brakes were prepared correctly and prove their action with a running brake test at the first opportunity.",
    "📻 <b>RULE OF THE DAY</b>\n\nRepeat every radio order back to the dispatcher word for word. An unconfirmed order is not an order — ask again until both sides agree.",
    "🌫 <b>RULE OF THE DAY</b>\n\nIn fog, heavy snow or any condition that hides signals, reduce speed so the train can be stopped within half the visible distance.",
    "🔔 <b>RULE OF THE DAY</b>\n\nSound the horn before every level crossing, tunnel portal and work site, whether or not people are visible. The warning is for the person you cannot see.",
    "⚠️ <b>RULE OF THE DAY</b>\n\nA signal seen imperfectly is a stop signal. When in doubt about an aspect, act on the most restrictive interpretation.",
    "🛤 <b>RULE OF THE DAY</b>\n\nDuring shunting, movement authority comes from one designated person only. Ignore gestures from anyone else, however confident they look.",
    "🚉 <b>RULE OF THE DAY</b>\n\nWhen passing a platform, watch the edge, not the crowd. Be ready to brake for a person or object inside the gauge.",
    "🔧 <b>RULE OF THE DAY</b>\n\nReport every abnormality in locomotive behaviour, however small, before the next trip. A logged defect is a defect that gets fixed.",
    "🧯 <b>RULE OF THE DAY</b>\n\nKnow the location and type of every fire extinguisher in your cab before departure. Checking during an emergency is too late.",
    "🌡 <b>RULE OF THE DAY</b>\n\nAfter a prolonged brake application on a long descent, allow full recharge time before the next application. Depleted reservoirs do not announce themselves.",
    "🚷 <b>RULE OF THE DAY</b>\n\nNever step between vehicles until the driver has confirmed the consist is secured and movement is excluded.",
    "📋 <b>RULE OF THE DAY</b>\n\nTake duty only after reading the orders book in full. New bulletins outrank habit.",
    "🔦 <b>RULE OF THE DAY</b>\n\nAt night, a white light waved in a circle means stop. Any light waved violently means stop. When unsure what a light means — stop.",
    "🧊 <b>RULE OF THE DAY</b>\n\nIn freezing weather, test brakes more often: condensate ice in the air line degrades braking gradually, then suddenly.",
    "👥 <b>RULE OF THE DAY</b>\n\nThe driver and assistant check each other. Challenging a colleague's call-out is cooperation, not distrust.",
    "🛃 <b>RULE OF THE DAY</b>\n\nSpeed restrictions over temporary work sites apply from the warning board, not from where the workers are visible.",
    "💤 <b>RULE OF THE DAY</b>\n\nIf you feel drowsiness approaching, say so immediately and apply the agreed countermeasures. Admitting fatigue is a professional act.",
    "🔁 <b>RULE OF THE DAY</b>\n\nA completed trip is not a finished job. Secure the locomotive, log remarks, and brief the relieving crew on everything irregular.",
];

const SAFETY_NUMBERS: [&str; 4] = [
    "📊 <b>SAFETY FIGURE</b>\n\nThe stopping distance of a 6000 t freight train on a 10 ‰ descent at 70 km/h is about <b>1200 metres</b>. Brake where the calculation says, not where the signal appears.",
    "⏱ <b>SAFETY FIGURE</b>\n\nOne second of driver reaction time at 50 km/h is <b>14 metres</b> of track. Every distraction in the cab is measured in metres.",
    "🌙 <b>SAFETY FIGURE</b>\n\nAfter 18 hours awake, reaction times degrade as much as at <b>0.5 ‰ blood alcohol</b>. Rest norms are braking distance for the mind.",
    "🚄 <b>SAFETY FIGURE</b>\n\nDoubling speed from 40 to 80 km/h roughly <b>quadruples</b> braking distance. Kinetic energy grows with the square of speed — the rulebook margins already know this.",
];

const TECH_TRAINING: [&str; 4] = [
    "🔧 <b>TECHNICAL TRAINING: TEM2</b>\n\nThe resistor control system has 25 controller notches. Pause 2–3 seconds between notches: rushing transitions overloads the traction circuit contactors.",
    "🔧 <b>TECHNICAL TRAINING: 2TE10M</b>\n\n10D100 engine critical parameters: oil pressure minimum <b>1.2 kgf/cm²</b>, water temperature maximum <b>90 °C</b>. Shut down first, investigate second.",
    "🔧 <b>TECHNICAL TRAINING: AIR BRAKES</b>\n\nA full service application drops the brake pipe by 1.5–1.7 kgf/cm². Deeper reductions buy little extra force but cost recharge time on the next application.",
    "🔧 <b>TECHNICAL TRAINING: TRACTION MOTORS</b>\n\nSustained operation below the minimum continuous speed overheats traction motors at full load. Watch current, not just speed, on long grades.",
];

const INCIDENT_ANALYSIS: [&str; 4] = [
    "🔍 <b>INCIDENT ANALYSIS</b>\n\nA shunting locomotive passed a signal at danger.\n<b>Error chain:</b>\n1. The assistant was distracted by paperwork\n2. The driver did not call out the aspect\n3. Nobody challenged the silence\n\nOne call-out would have broken the chain.",
    "🔍 <b>INCIDENT ANALYSIS</b>\n\nRolling stock ran away from a siding.\n<b>Error chain:</b>\n1. Insufficient brake shoes for the gradient\n2. Securing not verified by a second person\n3. Wind load ignored\n\nSecuring norms assume the worst day, not the average one.",
    "🔍 <b>INCIDENT ANALYSIS</b>\n\nA train overran a temporary speed restriction.\n<b>Error chain:</b>\n1. The bulletin was read but not noted in the log\n2. The warning board was obscured by vegetation\n3. Speed was managed from memory\n\nMemory is not a safety system.",
    "🔍 <b>INCIDENT ANALYSIS</b>\n\nA collision during a push-back move.\n<b>Error chain:</b>\n1. Radio contact lost mid-move and the move continued\n2. No agreed stopping point\n3. The leading end was unattended\n\nLost contact means stop — it is the rule precisely because it feels excessive.",
];

const PSYCHOLOGY: [&str; 4] = [
    "🧠 <b>SAFETY PSYCHOLOGY</b>\n\nMultitasking is a myth: the brain switches, it does not parallelise. On approach to signals, strip the cab of every competing task.",
    "🧠 <b>SAFETY PSYCHOLOGY</b>\n\nHabituation syndrome: after a thousand safe trips the perceived risk drops to zero while the real risk has not moved. Treat trip 1001 like trip 1.",
    "🧠 <b>SAFETY PSYCHOLOGY</b>\n\nExpectation bias: on a route you know, you see the signal you expect, not the signal displayed. Call-outs exist to force perception back to reality.",
    "🧠 <b>SAFETY PSYCHOLOGY</b>\n\nPressure to stay on schedule is felt strongest exactly when conditions argue for slowing down. A late arrival is recoverable.",
];

const ASSISTANT_DUTIES: [&str; 4] = [
    "👨‍💼 <b>ASSISTANT DRIVER DUTIES</b>\n\nDuring shunting:\n• verify the route is clear before every move\n• give crisp, unambiguous signals to the driver\n• watch clearances on the off side",
    "👨‍💼 <b>ASSISTANT DRIVER DUTIES</b>\n\nSecuring a consist:\n• place brake shoes exactly per the gradient norm\n• apply and count hand brakes\n• verify holding before reporting secured",
    "👨‍💼 <b>ASSISTANT DRIVER DUTIES</b>\n\nEn route:\n• repeat every signal aspect the driver calls\n• monitor brake pipe pressure at every application\n• report anything unusual without waiting to be asked",
    "👨‍💼 <b>ASSISTANT DRIVER DUTIES</b>\n\nAt crew change:\n• hand over the remarks log personally\n• state fuel, sand and brake condition explicitly\n• name every temporary restriction on the next section",
];

fn table(content_type: ContentType) -> &'static [&'static str] {
    match content_type {
        ContentType::DailyRule => &DAILY_RULES,
        ContentType::SafetyNumber => &SAFETY_NUMBERS,
        ContentType::TechTraining => &TECH_TRAINING,
        ContentType::IncidentAnalysis => &INCIDENT_ANALYSIS,
        ContentType::Psychology => &PSYCHOLOGY,
        ContentType::AssistantDuties => &ASSISTANT_DUTIES,
    }
}

/// Immutable lookup table shared read-only by every component.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    days_per_week: u32,
}

impl Catalog {
    /// `days_per_week` below 1 is clamped; config validation rejects it
    /// earlier, this keeps the arithmetic total regardless.
    pub fn new(days_per_week: u32) -> Self {
        Self {
            days_per_week: days_per_week.max(1),
        }
    }

    /// 1-based week index for a 1-based day index. Day 0 maps to week 1.
    pub fn week_of(&self, day: u32) -> u32 {
        day.saturating_sub(1) / self.days_per_week + 1
    }

    /// Resolve `(content_type, day)` to a message body.
    ///
    /// Pure and side-effect free; the only failure mode is an unmapped
    /// type/day pair.
    pub fn lookup(&self, content_type: ContentType, day: u32) -> Result<&'static str> {
        let not_found = || ContentError::NotFound {
            content_type: content_type.to_string(),
            day,
        };
        if day == 0 {
            return Err(not_found());
        }
        let index = match cadence(content_type) {
            Cadence::Daily => day,
            Cadence::Weekly => self.week_of(day),
        };
        table(content_type)
            .get(index as usize - 1)
            .copied()
            .ok_or_else(not_found)
    }
}
