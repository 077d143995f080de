use chrono::{
  Datelike,
  Days,
  Local,
  NaiveDate
};

/// Calendar date in the host's local
/// timezone. Projections take the date
/// as an argument so they stay pure;
/// callers pass this in.
#[must_use]
pub fn local_today() -> NaiveDate {
  Local::now().date_naive()
}

/// Monday of the week containing
/// `today`. Day-of-week arithmetic
/// shifts back `(weekday + 6) % 7`
/// days, with 0 = Sunday.
#[must_use]
pub fn week_start(
  today: NaiveDate
) -> NaiveDate {
  let weekday = today
    .weekday()
    .num_days_from_sunday();
  let back =
    u64::from((weekday + 6) % 7);
  today
    .checked_sub_days(Days::new(back))
    .unwrap_or(today)
}

/// The seven consecutive days starting
/// at the Monday of `today`'s week.
#[must_use]
pub fn week_days(
  today: NaiveDate
) -> [NaiveDate; 7] {
  let start = week_start(today);
  std::array::from_fn(|offset| {
    start
      .checked_add_days(Days::new(
        offset as u64
      ))
      .unwrap_or(start)
  })
}

/// Render a raw "HH:MM" range as a
/// 12-hour clock string. Unparsable
/// input is passed through untouched.
#[must_use]
pub fn format_time_range(
  raw: &str
) -> String {
  let Some((hours, minutes)) =
    raw.split_once(':')
  else {
    return raw.to_string();
  };

  let Ok(hour) = hours.parse::<u32>()
  else {
    return raw.to_string();
  };
  if hour > 23
    || minutes.len() != 2
    || minutes
      .parse::<u32>()
      .map(|m| m > 59)
      .unwrap_or(true)
  {
    return raw.to_string();
  }

  let meridiem = if hour >= 12 {
    "PM"
  } else {
    "AM"
  };
  let display = match hour % 12 {
    | 0 => 12,
    | h => h
  };

  format!(
    "{display}:{minutes} {meridiem}"
  )
}
