mod urls;
mod users;
