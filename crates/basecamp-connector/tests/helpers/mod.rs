pub mod mock_basecamp;
