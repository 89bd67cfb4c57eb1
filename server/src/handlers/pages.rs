//! Bare HTML forms posting back to their own route.

pub const REGISTER_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Register</title></head>
<body>
<h1>Register</h1>
<form method="post" action="/register">
  <label>Username <input name="username" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Register</button>
</form>
<p><a href="/login">Log in</a></p>
</body>
</html>
"#;

pub const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Log in</title></head>
<body>
<h1>Log in</h1>
<form method="post" action="/login">
  <label>Username <input name="username" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Log in</button>
</form>
<p><a href="/register">Register</a></p>
</body>
</html>
"#;

pub const ADD_EVENT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Add event</title></head>
<body>
<h1>Add event</h1>
<form method="post" action="/add-event">
  <label>Name <input name="name" required></label>
  <label>Category <input name="category" required></label>
  <label>Status <input name="status" required></label>
  <label>Time <input name="time" type="time" required></label>
  <label>Location <input name="location_name" required></label>
  <label>Address <input name="location_address"></label>
  <button type="submit">Add</button>
</form>
<p><a href="/logout">Log out</a></p>
</body>
</html>
"#;
